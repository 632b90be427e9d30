//! Built-in walkthrough scripts

use super::model::{DisplayMessage, MatchPolicy, Script, ScriptStep};

/// Create the flight booking walkthrough
pub fn travel_booking() -> Script {
    Script::new(
        "travel_booking",
        "Travel Booking",
        vec![
            ScriptStep::say("Hi Ash! Ready to plan a trip?\n\n(Please reply: Flights)"),
            ScriptStep::expect("Flights"),
            ScriptStep::say("Great. Where are you flying from and to?\n\n(Please reply: From JFK to LAX)"),
            ScriptStep::expect("From JFK to LAX"),
            ScriptStep::say("And your travel dates?\n\n(Please reply: Jul 12 – Jul 16)"),
            ScriptStep::expect("Jul 12 – Jul 16"),
            ScriptStep::say(
                "Here are some options for round-trip flights JFK → LAX:\n\n\
                 1. Delta – Nonstop, 9:30am–12:30pm, $278\n\
                 2. JetBlue – 11:00am–2:05pm, Free Wi-Fi, $265\n\
                 3. United – 1 stop, 8:00am–1:45pm, $240\n\n\
                 (Please reply: JetBlue)",
            ),
            ScriptStep::expect("JetBlue"),
            ScriptStep::say("Great! Do you want to add a hotel too?\n\n(Please reply: No, just flight)"),
            ScriptStep::expect("No, just flight"),
            ScriptStep::say(
                "Final details:\n\
                 - JetBlue, JFK → LAX\n\
                 - Jul 12–Jul 16\n\
                 - $265 round-trip\n\n\
                 Ready to book?\n\n(Please reply: Confirm)",
            ),
            ScriptStep::expect("Confirm"),
            ScriptStep::say("✅ Booking confirmed! Have a great trip, Ash."),
        ],
    )
}

/// Create the to-do list walkthrough
///
/// There is no greeting: the user opens with the first command. Replies are
/// matched case-insensitively.
pub fn todo_list() -> Script {
    let exchanges = [
        (
            "add walk the dog",
            "Sure! 🐶 I've added \"walk the dog\" to your to-do list.\nTo-Do List:\n1. Walk the dog",
        ),
        (
            "add buy milk",
            "Done! 🛒 I've added \"buy milk\".\nTo-Do List:\n1. Walk the dog\n2. Buy milk",
        ),
        (
            "add call mom",
            "Absolutely! 📞 I've added \"call mom\".\nTo-Do List:\n1. Walk the dog\n2. Buy milk\n3. Call mom",
        ),
        (
            "remove walk the dog",
            "Removed \"walk the dog\" from your list.\nTo-Do List:\n1. Buy milk\n2. Call mom",
        ),
        ("list", "Here's your to-do list:\n1. Buy milk\n2. Call mom"),
        ("clear", "All clear! 🧹 Your to-do list is now empty."),
        ("add meditate", "Nice! 🧘 I've added \"meditate\".\nTo-Do List:\n1. Meditate"),
        ("list", "Here's your to-do list:\n1. Meditate"),
    ];

    let steps = exchanges
        .iter()
        .flat_map(|(command, reply)| [ScriptStep::expect(*command), ScriptStep::say(*reply)])
        .collect();

    Script::new("todo_list", "To-Do List", steps)
        .with_policy(MatchPolicy::case_insensitive())
        .with_reprompt("Please type: '{expected}' to continue.")
        .with_completion(vec![DisplayMessage::text(
            "✅ You've completed the to-do list walkthrough! Want to start over? Just refresh the session.",
        )])
}

/// All scripts shipped with the bot
pub fn all() -> Vec<Script> {
    vec![travel_booking(), todo_list()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripts::Walkthrough;

    #[test]
    fn test_builtin_scripts_compile() {
        for script in all() {
            let id = script.id.clone();
            assert!(Walkthrough::compile(script).is_ok(), "script {} should compile", id);
        }
    }

    #[test]
    fn test_travel_booking_shape() {
        let walkthrough = Walkthrough::compile(travel_booking()).unwrap();
        assert_eq!(walkthrough.num_user_steps(), 6);
        assert_eq!(
            walkthrough.opening(),
            &[DisplayMessage::text("Hi Ash! Ready to plan a trip?\n\n(Please reply: Flights)")]
        );
        assert_eq!(
            walkthrough.completion(),
            &[DisplayMessage::text("✅ Booking confirmed! Have a great trip, Ash.")]
        );
    }

    #[test]
    fn test_flight_options_keep_line_breaks() {
        let walkthrough = Walkthrough::compile(travel_booking()).unwrap();
        let body = walkthrough.gate(2).unwrap().replies[0].body().unwrap().to_string();
        assert!(body.contains("JFK → LAX:\n\n1. Delta"));
        assert!(body.ends_with("$240\n\n(Please reply: JetBlue)"));
    }

    #[test]
    fn test_todo_list_shape() {
        let walkthrough = Walkthrough::compile(todo_list()).unwrap();
        assert_eq!(walkthrough.num_user_steps(), 8);
        assert!(walkthrough.opening().is_empty());
        assert!(!walkthrough.policy().case_sensitive);
        assert_eq!(
            walkthrough.reprompt_for("list"),
            DisplayMessage::text("Please type: 'list' to continue.")
        );
    }
}
