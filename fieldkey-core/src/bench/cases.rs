//! Built-in benchmark case sets.

use serde_json::{json, Value};

use super::{BenchmarkCase, Difficulty};
use crate::tools::{catalog, Arguments, ExpectedCall, Message};

use Difficulty::{Easy, Hard, Medium};

fn case(
    name: &str,
    difficulty: Difficulty,
    text: &str,
    tools: &[&str],
    expected_calls: Vec<ExpectedCall>,
) -> BenchmarkCase {
    BenchmarkCase {
        name: name.to_string(),
        difficulty,
        messages: vec![Message::user(text)],
        tools: catalog::select(tools),
        expected_calls,
    }
}

fn call(name: &str, arguments: Value) -> ExpectedCall {
    let arguments: Arguments = match arguments {
        Value::Object(map) => map.into_iter().collect(),
        _ => Arguments::new(),
    };
    ExpectedCall {
        name: name.to_string(),
        arguments,
    }
}

/// The fixed 50-case set: 10 easy, 10 medium, 30 hard.
pub fn builtin_cases() -> Vec<BenchmarkCase> {
    vec![
        // Easy: one tool, direct request.
        case(
            "weather_sf",
            Easy,
            "What is the weather in San Francisco?",
            &["get_weather"],
            vec![call("get_weather", json!({ "location": "San Francisco" }))],
        ),
        case(
            "alarm_10am",
            Easy,
            "Set an alarm for 10 AM.",
            &["set_alarm"],
            vec![call("set_alarm", json!({ "hour": 10, "minute": 0 }))],
        ),
        case(
            "message_alice",
            Easy,
            "Send a message to Alice saying good morning.",
            &["send_message"],
            vec![
                call("send_message", json!({ "recipient": "Alice", "message": "good morning" })),
            ],
        ),
        case(
            "weather_london",
            Easy,
            "What's the weather like in London?",
            &["get_weather"],
            vec![call("get_weather", json!({ "location": "London" }))],
        ),
        case(
            "alarm_6am",
            Easy,
            "Wake me up at 6 AM.",
            &["set_alarm"],
            vec![call("set_alarm", json!({ "hour": 6, "minute": 0 }))],
        ),
        case(
            "play_bohemian",
            Easy,
            "Play Bohemian Rhapsody.",
            &["play_music"],
            vec![call("play_music", json!({ "song": "Bohemian Rhapsody" }))],
        ),
        case(
            "timer_5min",
            Easy,
            "Set a timer for 5 minutes.",
            &["set_timer"],
            vec![call("set_timer", json!({ "minutes": 5 }))],
        ),
        case(
            "reminder_meeting",
            Easy,
            "Remind me about the meeting at 3:00 PM.",
            &["create_reminder"],
            vec![
                call("create_reminder", json!({ "title": "meeting", "time": "3:00 PM" })),
            ],
        ),
        case(
            "search_bob",
            Easy,
            "Find Bob in my contacts.",
            &["search_contacts"],
            vec![call("search_contacts", json!({ "query": "Bob" }))],
        ),
        case(
            "weather_paris",
            Easy,
            "How's the weather in Paris?",
            &["get_weather"],
            vec![call("get_weather", json!({ "location": "Paris" }))],
        ),
        // Medium: pick the right tool among several.
        case(
            "message_among_three",
            Medium,
            "Send a message to John saying hello.",
            &["get_weather", "send_message", "set_alarm"],
            vec![
                call("send_message", json!({ "recipient": "John", "message": "hello" })),
            ],
        ),
        case(
            "weather_among_two",
            Medium,
            "What's the weather in Tokyo?",
            &["get_weather", "send_message"],
            vec![call("get_weather", json!({ "location": "Tokyo" }))],
        ),
        case(
            "alarm_among_three",
            Medium,
            "Set an alarm for 8:15 AM.",
            &["send_message", "set_alarm", "get_weather"],
            vec![call("set_alarm", json!({ "hour": 8, "minute": 15 }))],
        ),
        case(
            "music_among_three",
            Medium,
            "Play some jazz music.",
            &["set_alarm", "play_music", "get_weather"],
            vec![call("play_music", json!({ "song": "jazz" }))],
        ),
        case(
            "reminder_among_four",
            Medium,
            "Remind me to call the dentist at 2:00 PM.",
            &["get_weather", "send_message", "create_reminder", "set_alarm"],
            vec![
                call("create_reminder", json!({ "title": "call the dentist", "time": "2:00 PM" })),
            ],
        ),
        case(
            "timer_among_three",
            Medium,
            "Set a timer for 10 minutes.",
            &["set_alarm", "set_timer", "play_music"],
            vec![call("set_timer", json!({ "minutes": 10 }))],
        ),
        case(
            "search_among_four",
            Medium,
            "Look up Sarah in my contacts.",
            &["send_message", "get_weather", "search_contacts", "set_alarm"],
            vec![call("search_contacts", json!({ "query": "Sarah" }))],
        ),
        case(
            "weather_among_four",
            Medium,
            "What's the weather in Berlin?",
            &["send_message", "set_alarm", "play_music", "get_weather"],
            vec![call("get_weather", json!({ "location": "Berlin" }))],
        ),
        case(
            "message_among_four",
            Medium,
            "Text Dave saying I'll be late.",
            &["get_weather", "set_timer", "send_message", "play_music"],
            vec![
                call("send_message", json!({ "recipient": "Dave", "message": "I'll be late" })),
            ],
        ),
        case(
            "alarm_among_five",
            Medium,
            "Set an alarm for 9 AM.",
            &["send_message", "get_weather", "play_music", "set_timer", "set_alarm"],
            vec![call("set_alarm", json!({ "hour": 9, "minute": 0 }))],
        ),
        // Hard: two or three calls from one utterance.
        case(
            "message_and_weather",
            Hard,
            "Send a message to Bob saying hi and get the weather in London.",
            &["get_weather", "send_message", "set_alarm"],
            vec![
                call("send_message", json!({ "recipient": "Bob", "message": "hi" })),
                call("get_weather", json!({ "location": "London" })),
            ],
        ),
        case(
            "alarm_and_weather",
            Hard,
            "Set an alarm for 7:30 AM and check the weather in New York.",
            &["get_weather", "set_alarm", "send_message"],
            vec![
                call("set_alarm", json!({ "hour": 7, "minute": 30 })),
                call("get_weather", json!({ "location": "New York" })),
            ],
        ),
        case(
            "timer_and_music",
            Hard,
            "Set a timer for 20 minutes and play lo-fi beats.",
            &["set_timer", "play_music", "get_weather", "set_alarm"],
            vec![
                call("set_timer", json!({ "minutes": 20 })),
                call("play_music", json!({ "song": "lo-fi beats" })),
            ],
        ),
        case(
            "reminder_and_message",
            Hard,
            "Remind me about groceries at 5:00 PM and text Lisa saying see you tonight.",
            &["create_reminder", "send_message", "get_weather", "set_alarm"],
            vec![
                call("create_reminder", json!({ "title": "groceries", "time": "5:00 PM" })),
                call("send_message", json!({ "recipient": "Lisa", "message": "see you tonight" })),
            ],
        ),
        case(
            "search_and_message",
            Hard,
            "Find Tom in my contacts and send him a message saying happy birthday.",
            &["search_contacts", "send_message", "get_weather", "play_music"],
            vec![
                call("search_contacts", json!({ "query": "Tom" })),
                call("send_message", json!({ "recipient": "Tom", "message": "happy birthday" })),
            ],
        ),
        case(
            "alarm_and_reminder",
            Hard,
            "Set an alarm for 6:45 AM and remind me to take medicine at 7:00 AM.",
            &["set_alarm", "create_reminder", "send_message", "play_music"],
            vec![
                call("set_alarm", json!({ "hour": 6, "minute": 45 })),
                call("create_reminder", json!({ "title": "take medicine", "time": "7:00 AM" })),
            ],
        ),
        case(
            "weather_and_music",
            Hard,
            "Check the weather in Miami and play summer hits.",
            &["get_weather", "play_music", "set_timer", "send_message"],
            vec![
                call("get_weather", json!({ "location": "Miami" })),
                call("play_music", json!({ "song": "summer hits" })),
            ],
        ),
        case(
            "message_weather_alarm",
            Hard,
            "Text Emma saying good night, check the weather in Chicago, and set an alarm for 5 AM.",
            &["send_message", "get_weather", "set_alarm", "play_music", "set_timer"],
            vec![
                call("send_message", json!({ "recipient": "Emma", "message": "good night" })),
                call("get_weather", json!({ "location": "Chicago" })),
                call("set_alarm", json!({ "hour": 5, "minute": 0 })),
            ],
        ),
        case(
            "timer_music_reminder",
            Hard,
            "Set a 15 minute timer, play classical music, and remind me to stretch at 4:00 PM.",
            &["set_timer", "play_music", "create_reminder", "get_weather", "send_message"],
            vec![
                call("set_timer", json!({ "minutes": 15 })),
                call("play_music", json!({ "song": "classical music" })),
                call("create_reminder", json!({ "title": "stretch", "time": "4:00 PM" })),
            ],
        ),
        case(
            "search_message_weather",
            Hard,
            "Look up Jake in my contacts, send him a message saying let's meet, and check the weather in Seattle.",
            &["search_contacts", "send_message", "get_weather", "set_alarm", "play_music"],
            vec![
                call("search_contacts", json!({ "query": "Jake" })),
                call("send_message", json!({ "recipient": "Jake", "message": "let's meet" })),
                call("get_weather", json!({ "location": "Seattle" })),
            ],
        ),
        case(
            "light_and_thermostat",
            Hard,
            "Turn on the kitchen light and set the thermostat to 72.",
            &["turn_on_light", "set_thermostat", "get_weather", "set_alarm"],
            vec![
                call("turn_on_light", json!({ "room": "kitchen" })),
                call("set_thermostat", json!({ "temperature": 72 })),
            ],
        ),
        case(
            "directions_and_restaurant",
            Hard,
            "Find an Italian restaurant and get directions to the airport.",
            &["find_restaurant", "get_directions", "get_weather", "send_message"],
            vec![
                call("find_restaurant", json!({ "cuisine": "Italian" })),
                call("get_directions", json!({ "destination": "airport" })),
            ],
        ),
        case(
            "workout_and_music",
            Hard,
            "Log a 30 minute running workout and play workout beats.",
            &["log_workout", "play_music", "set_timer", "get_weather"],
            vec![
                call("log_workout", json!({ "activity": "running", "duration": 30 })),
                call("play_music", json!({ "song": "workout beats" })),
            ],
        ),
        case(
            "event_and_message",
            Hard,
            "Create an event called team standup at 9:00 AM and send a message to Mike saying meeting at nine.",
            &["create_event", "send_message", "set_alarm", "create_reminder"],
            vec![
                call("create_event", json!({ "title": "team standup", "time": "9:00 AM" })),
                call("send_message", json!({ "recipient": "Mike", "message": "meeting at nine" })),
            ],
        ),
        case(
            "translate_and_note",
            Hard,
            "Translate hello to Spanish and take a note called greetings with content basic phrases.",
            &["translate_text", "take_note", "send_message", "read_news"],
            vec![
                call("translate_text", json!({ "text": "hello", "language": "Spanish" })),
                call("take_note", json!({ "title": "greetings", "content": "basic phrases" })),
            ],
        ),
        case(
            "cart_and_ride",
            Hard,
            "Add 2 batteries to the cart and book an economy ride to downtown.",
            &["add_to_cart", "book_ride", "get_directions", "set_timer"],
            vec![
                call("add_to_cart", json!({ "item": "batteries", "quantity": 2 })),
                call("book_ride", json!({ "destination": "downtown", "ride_type": "economy" })),
            ],
        ),
        case(
            "volume_and_lock",
            Hard,
            "Set the volume to 50 and lock the front door.",
            &["set_volume", "lock_door", "turn_on_light", "set_thermostat"],
            vec![
                call("set_volume", json!({ "level": 50 })),
                call("lock_door", json!({ "door": "front door" })),
            ],
        ),
        case(
            "news_and_weather",
            Hard,
            "Read the latest sports news and check the weather in Denver.",
            &["read_news", "get_weather", "play_music", "send_message"],
            vec![
                call("read_news", json!({ "topic": "sports" })),
                call("get_weather", json!({ "location": "Denver" })),
            ],
        ),
        case(
            "event_and_timer",
            Hard,
            "Create an event called lunch with Sarah at 12:00 PM and set a timer for 45 minutes.",
            &["create_event", "set_timer", "set_alarm", "send_message"],
            vec![
                call("create_event", json!({ "title": "lunch with Sarah", "time": "12:00 PM" })),
                call("set_timer", json!({ "minutes": 45 })),
            ],
        ),
        case(
            "light_and_music",
            Hard,
            "Turn on the bedroom light and play relaxing piano.",
            &["turn_on_light", "play_music", "set_volume", "lock_door"],
            vec![
                call("turn_on_light", json!({ "room": "bedroom" })),
                call("play_music", json!({ "song": "relaxing piano" })),
            ],
        ),
        case(
            "directions_and_message",
            Hard,
            "Get directions to the hospital and text Anna saying on my way.",
            &["get_directions", "send_message", "book_ride", "get_weather"],
            vec![
                call("get_directions", json!({ "destination": "hospital" })),
                call("send_message", json!({ "recipient": "Anna", "message": "on my way" })),
            ],
        ),
        case(
            "workout_and_timer",
            Hard,
            "Log a 20 minute yoga workout and set a timer for 5 minutes.",
            &["log_workout", "set_timer", "play_music", "set_alarm"],
            vec![
                call("log_workout", json!({ "activity": "yoga", "duration": 20 })),
                call("set_timer", json!({ "minutes": 5 })),
            ],
        ),
        case(
            "ride_and_message",
            Hard,
            "Book a premium ride to the train station and send a message to Carlos saying arriving soon.",
            &["book_ride", "send_message", "get_directions", "check_order_status"],
            vec![
                call("book_ride", json!({ "destination": "train station", "ride_type": "premium" })),
                call("send_message", json!({ "recipient": "Carlos", "message": "arriving soon" })),
            ],
        ),
        case(
            "note_and_alarm",
            Hard,
            "Take a note called project ideas with content brainstorm session and set an alarm for 7:00 AM.",
            &["take_note", "set_alarm", "create_reminder", "send_message"],
            vec![
                call("take_note", json!({ "title": "project ideas", "content": "brainstorm session" })),
                call("set_alarm", json!({ "hour": 7, "minute": 0 })),
            ],
        ),
        case(
            "thermostat_and_lock",
            Hard,
            "Set the thermostat to 68 and lock the back door.",
            &["set_thermostat", "lock_door", "turn_on_light", "set_volume"],
            vec![
                call("set_thermostat", json!({ "temperature": 68 })),
                call("lock_door", json!({ "door": "back door" })),
            ],
        ),
        case(
            "superhard_night_routine",
            Hard,
            "Turn on the living room light, set the thermostat to 65, and lock the front door.",
            &["turn_on_light", "set_thermostat", "lock_door", "set_volume", "get_weather"],
            vec![
                call("turn_on_light", json!({ "room": "living room" })),
                call("set_thermostat", json!({ "temperature": 65 })),
                call("lock_door", json!({ "door": "front door" })),
            ],
        ),
        case(
            "superhard_morning_info",
            Hard,
            "Check the weather in Boston, read the technology news, and set an alarm for 6:30 AM.",
            &["get_weather", "read_news", "set_alarm", "play_music", "send_message"],
            vec![
                call("get_weather", json!({ "location": "Boston" })),
                call("read_news", json!({ "topic": "technology" })),
                call("set_alarm", json!({ "hour": 6, "minute": 30 })),
            ],
        ),
        case(
            "superhard_travel_prep",
            Hard,
            "Book a premium ride to the airport, get directions to the airport, and text Rachel saying leaving now.",
            &["book_ride", "get_directions", "send_message", "get_weather", "set_timer"],
            vec![
                call("book_ride", json!({ "destination": "airport", "ride_type": "premium" })),
                call("get_directions", json!({ "destination": "airport" })),
                call("send_message", json!({ "recipient": "Rachel", "message": "leaving now" })),
            ],
        ),
        case(
            "superhard_entertainment",
            Hard,
            "Turn on the living room light, set the volume to 80, and play ambient chill.",
            &["turn_on_light", "set_volume", "play_music", "lock_door", "set_thermostat"],
            vec![
                call("turn_on_light", json!({ "room": "living room" })),
                call("set_volume", json!({ "level": 80 })),
                call("play_music", json!({ "song": "ambient chill" })),
            ],
        ),
        case(
            "superhard_gym_session",
            Hard,
            "Log a 45 minute cycling workout, play upbeat electronic, and set a timer for 10 minutes.",
            &["log_workout", "play_music", "set_timer", "set_alarm", "get_weather"],
            vec![
                call("log_workout", json!({ "activity": "cycling", "duration": 45 })),
                call("play_music", json!({ "song": "upbeat electronic" })),
                call("set_timer", json!({ "minutes": 10 })),
            ],
        ),
    ]
}

/// Natural phrasings that pattern extraction is known to struggle with.
/// Scored like any other case but not expected to pass.
pub fn stress_cases() -> Vec<BenchmarkCase> {
    vec![
        case(
            "eb1_weather_no_preposition",
            Hard,
            "How's the New York weather today?",
            &["get_weather", "send_message", "set_alarm"],
            vec![call("get_weather", json!({ "location": "New York" }))],
        ),
        case(
            "eb2_person_name_first",
            Hard,
            "Message Bob saying I'm running late.",
            &["send_message", "get_weather", "set_alarm"],
            vec![
                call("send_message", json!({ "recipient": "Bob", "message": "I'm running late" })),
            ],
        ),
        case(
            "eb3_duration_word",
            Hard,
            "Set a timer for twenty five minutes.",
            &["set_timer", "set_alarm", "play_music"],
            vec![call("set_timer", json!({ "minutes": 25 }))],
        ),
        case(
            "eb4_implicit_message",
            Hard,
            "Let Alice know I'll be there at 5.",
            &["send_message", "set_alarm", "create_reminder"],
            vec![
                call("send_message", json!({ "recipient": "Alice", "message": "I'll be there at 5" })),
            ],
        ),
        case(
            "eb5_multiword_destination",
            Hard,
            "Get directions to San Francisco International Airport.",
            &["get_directions", "get_weather", "book_ride"],
            vec![
                call("get_directions", json!({ "destination": "San Francisco International Airport" })),
            ],
        ),
        case(
            "hb1_conversational_weather",
            Hard,
            "Is it going to rain in Tokyo tomorrow?",
            &["get_weather", "read_news", "send_message"],
            vec![call("get_weather", json!({ "location": "Tokyo" }))],
        ),
        case(
            "hb2_alarm_relative_time",
            Hard,
            "Wake me up in 2 hours.",
            &["set_alarm", "set_timer", "create_reminder"],
            vec![call("set_alarm", json!({ "hour": 2, "minute": 0 }))],
        ),
        case(
            "hb3_restaurant_no_cuisine_word",
            Hard,
            "Find somewhere good to eat sushi nearby.",
            &["find_restaurant", "get_directions", "read_news"],
            vec![call("find_restaurant", json!({ "cuisine": "sushi" }))],
        ),
        case(
            "hb4_pronoun_chain_implicit",
            Hard,
            "Look up Maria and wish her happy birthday.",
            &["search_contacts", "send_message", "get_weather", "play_music"],
            vec![
                call("search_contacts", json!({ "query": "Maria" })),
                call("send_message", json!({ "recipient": "Maria", "message": "happy birthday" })),
            ],
        ),
        case(
            "hb5_fully_implicit",
            Hard,
            "I need to remember to buy milk at 4 PM and let Sarah know about dinner.",
            &["create_reminder", "send_message", "set_alarm", "search_contacts"],
            vec![
                call("create_reminder", json!({ "title": "buy milk", "time": "4:00 PM" })),
                call("send_message", json!({ "recipient": "Sarah", "message": "dinner" })),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tier_counts() {
        let cases = builtin_cases();
        assert_eq!(cases.len(), 50);
        for (difficulty, expected) in [(Easy, 10), (Medium, 10), (Hard, 30)] {
            let n = cases.iter().filter(|c| c.difficulty == difficulty).count();
            assert_eq!(n, expected, "{difficulty}");
        }
    }

    #[test]
    fn every_case_offers_its_expected_tools() {
        for case in builtin_cases().into_iter().chain(stress_cases()) {
            assert!(!case.tools.is_empty(), "{}", case.name);
            for call in &case.expected_calls {
                assert!(
                    case.tools.iter().any(|t| t.name == call.name),
                    "{} expects {} outside its tool subset",
                    case.name,
                    call.name
                );
            }
        }
    }

    #[test]
    fn case_names_are_unique() {
        let cases = builtin_cases();
        let mut names: Vec<_> = cases.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cases.len());
        assert_eq!(stress_cases().len(), 10);
    }
}
