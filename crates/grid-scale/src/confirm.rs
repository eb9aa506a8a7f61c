//! Whether to ask before scaling, and what to ask.

use crate::plan::ScaleArguments;

/// The question to put to the user, or `None` when no confirmation is needed.
///
/// Confirmation is needed only when more workers are running than the new
/// maximum allows.
pub fn confirmation_prompt(args: &ScaleArguments, running_workers: i64) -> Option<String> {
    if running_workers <= args.workers_max {
        return None;
    }

    let question = if args.workers_min == args.workers_max {
        format!("Do you want to pin the number of worker nodes to {}?", args.workers_min)
    } else {
        format!(
            "Do you want to change the limits to be min={}, max={}?",
            args.workers_min, args.workers_max
        )
    };

    Some(format!(
        "The cluster currently has {running_workers} worker nodes running.\n{question}"
    ))
}

/// Interpret a typed answer; only `y`/`yes` (any case) confirm.
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(min: i64, max: i64) -> ScaleArguments {
        ScaleArguments {
            cluster_id: "f01r4".to_string(),
            num_workers_desired: 0,
            workers_min: min,
            workers_max: max,
        }
    }

    #[test]
    fn no_prompt_when_running_fits() {
        assert_eq!(confirmation_prompt(&args(3, 5), 5), None);
        assert_eq!(confirmation_prompt(&args(3, 5), 2), None);
    }

    #[test]
    fn pin_wording_for_equal_bounds() {
        let prompt = confirmation_prompt(&args(3, 3), 5).unwrap();
        assert_eq!(
            prompt,
            "The cluster currently has 5 worker nodes running.\n\
             Do you want to pin the number of worker nodes to 3?"
        );
    }

    #[test]
    fn limits_wording_for_band() {
        let prompt = confirmation_prompt(&args(2, 4), 6).unwrap();
        assert!(prompt.ends_with("Do you want to change the limits to be min=2, max=4?"));
    }

    #[test]
    fn answers() {
        assert!(is_confirmed("y"));
        assert!(is_confirmed(" YES\n"));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("n"));
        assert!(!is_confirmed("yep"));
    }
}
