//! Host condition evaluation.
//!
//! A preset's `condition` decides whether it applies to the machine running
//! the tool. Only the `${hostSystemName}` comparisons CMake itself supports
//! for this purpose are interpreted; any clause shape we do not recognize
//! counts as "does not hold" rather than an error, so one exotic preset
//! cannot take down a whole resolution run.

use crate::model::Condition;

/// The macro CMake substitutes with the host OS identifier.
pub const HOST_SYSTEM_NAME: &str = "${hostSystemName}";

/// Canonical identifier for the current host, matching CMake's
/// `${hostSystemName}`: `Windows`, `Linux` or `Darwin`.
pub fn current_host() -> String {
    match std::env::consts::OS {
        "windows" => "Windows".to_string(),
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        other => other.to_string(),
    }
}

/// Whether `condition` holds for `host`. Absent conditions hold.
pub fn holds(condition: Option<&Condition>, host: &str) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    match condition {
        Condition::Literal(value) => *value,
        Condition::Clause(clause) => match clause.kind.as_str() {
            "equals" if clause.lhs.as_deref() == Some(HOST_SYSTEM_NAME) => {
                clause.rhs.as_deref() == Some(host)
            }
            "notEquals" if clause.lhs.as_deref() == Some(HOST_SYSTEM_NAME) => {
                clause.rhs.as_deref() != Some(host)
            }
            "always" => true,
            "never" => false,
            _ => false,
        },
        Condition::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;

    fn clause(raw: &str) -> Condition {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn absent_condition_holds() {
        assert!(holds(None, "Linux"));
    }

    #[test]
    fn boolean_literal_is_taken_verbatim() {
        assert!(holds(Some(&Condition::Literal(true)), "Windows"));
        assert!(!holds(Some(&Condition::Literal(false)), "Windows"));
    }

    #[test]
    fn equals_matches_only_the_named_host() {
        let condition = Condition::host_equals("Darwin");
        assert!(holds(Some(&condition), "Darwin"));
        assert!(!holds(Some(&condition), "Linux"));
    }

    #[test]
    fn not_equals_inverts() {
        let condition = clause(
            r#"{"type": "notEquals", "lhs": "${hostSystemName}", "rhs": "Windows"}"#,
        );
        assert!(holds(Some(&condition), "Linux"));
        assert!(!holds(Some(&condition), "Windows"));
    }

    #[test]
    fn always_and_never() {
        assert!(holds(Some(&clause(r#"{"type": "always"}"#)), "Linux"));
        assert!(!holds(Some(&clause(r#"{"type": "never"}"#)), "Linux"));
    }

    #[test]
    fn equals_on_unknown_lhs_does_not_hold() {
        let condition = clause(r#"{"type": "equals", "lhs": "$env{CI}", "rhs": "true"}"#);
        assert!(!holds(Some(&condition), "Linux"));
    }

    #[test]
    fn unrecognized_shape_does_not_hold() {
        let condition = clause(r#"{"anyOf": [{"type": "always"}]}"#);
        assert!(!holds(Some(&condition), "Linux"));
    }
}
