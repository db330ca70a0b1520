// Lineage Conditions - Structural Error Taxonomy
//
// Every failure the object model can raise. All of these are programmer
// errors surfaced synchronously at the call site; the library never retries,
// recovers, or logs - propagation to the caller is the only policy.

use thiserror::Error;

/// Errors raised by the object model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// `Extend` was invoked on something that is not a class. Extension is a
    /// class-level operation; instances cannot be extended.
    #[error("cannot extend {target}: extension is a class-level operation")]
    InvalidExtendTarget { target: String },

    /// A class was invoked as a constructor, but neither it nor any ancestor
    /// defines a constructor function. The root defines none and terminates
    /// the search.
    #[error("class `{class}` has no constructor anywhere in its ancestry")]
    MissingConstructor { class: String },

    /// A constructor returned a value of the wrong shape: the first return
    /// value must be a fields table, and a present second value must be a
    /// parent instance.
    #[error("constructor for `{class}` returned {found} where {expected} was expected")]
    InvalidConstructorReturn {
        class: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ObjectError::InvalidExtendTarget {
            target: "an instance of `Point`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot extend an instance of `Point`: extension is a class-level operation"
        );

        let err = ObjectError::MissingConstructor {
            class: "Point".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "class `Point` has no constructor anywhere in its ancestry"
        );

        let err = ObjectError::InvalidConstructorReturn {
            class: "Point".to_string(),
            expected: "a fields table",
            found: "integer",
        };
        assert_eq!(
            err.to_string(),
            "constructor for `Point` returned integer where a fields table was expected"
        );
    }

    #[test]
    fn test_errors_compare_structurally() {
        let a = ObjectError::MissingConstructor {
            class: "A".to_string(),
        };
        let b = ObjectError::MissingConstructor {
            class: "A".to_string(),
        };
        assert_eq!(a, b);
        assert_ne!(
            a,
            ObjectError::MissingConstructor {
                class: "B".to_string()
            }
        );
    }
}
