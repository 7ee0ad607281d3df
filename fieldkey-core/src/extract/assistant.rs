//! Personal-assistant rules: weather, alarms, messaging, media, smart home,
//! travel, shopping and productivity.
//!
//! Local slots (times, numbers, destinations) are read from the clause that
//! mentions the tool, so "log a 20 minute workout and set a timer for 5
//! minutes" gives the timer 5, not 20.

use super::slots::{capture, clause_for, clean, find_clock_time, first_integer, parse_number, set, NUMBER};
use super::ExtractionRule;
use crate::tools::Arguments;

/// Sentinel for string slots that could not be located.
pub const UNKNOWN: &str = "unknown";

// ── Activation (lowercased text) ─────────────────────────────────────────────

pattern!(WEATHER, r"\bweather\b|\bforecast\b|\brain(?:ing|y)?\b|\bsnow(?:ing|y)?\b");
pattern!(ALARM, r"\balarm\b|\bwake me\b");
pattern!(
    MESSAGE,
    r"\bmessage\b|\btext\b|\bsaying\b|\btell\b|\blet\s+\w+\s+know\b|\bwish\b"
);
pattern!(REMINDER, r"\bremind(?:er)?\b|\bremember to\b");
pattern!(CONTACTS, r"\bcontacts?\b|\bfind\b|\blook\s+up\b|\bsearch\s+for\b");
pattern!(MUSIC, r"\bplay\b");
pattern!(TIMER, r"\btimer\b");
pattern!(LIGHT, r"\blights?\b");
pattern!(THERMOSTAT, r"\bthermostat\b|\bheating\b|\bdegrees\b");
pattern!(DIRECTIONS, r"\bdirections?\b|\bnavigate\b|\broute to\b");
pattern!(
    RESTAURANT,
    r"\brestaurants?\b|\bcuisine\b|\bfood\b|\beat\b|\bhungry\b"
);
pattern!(WORKOUT, r"\blog\b.*\b(?:workout|exercise)\b");
pattern!(WORKOUT_KEYWORD, r"\b(?:workout|exercise)\b");
pattern!(EVENT, r"\bevent\b|\bcalendar\b");
pattern!(TRANSLATE, r"\btranslat(?:e|ion)\b");
pattern!(NOTE, r"\bnotes?\b|\bjot\b|\bwrite down\b");
pattern!(CART, r"\bcart\b|\bbasket\b");
pattern!(
    ORDER,
    r"\border\s+(?:status|#|number|id|no)|\b(?:track|check|where(?:'s| is))\b.*\border\b"
);
pattern!(RIDE, r"\bride\b|\btaxi\b|\bcab\b|\buber\b|\blyft\b");
pattern!(VOLUME, r"\bvolume\b");
pattern!(LOCK, r"\block\b.*\bdoor\b|\block\s+(?:up|the)\b");
pattern!(NEWS, r"\bnews\b|\bheadlines\b");
pattern!(CURRENCY, r"\bconvert\b|\bcurrency\b|\bexchange\b");

// ── Slots (original casing) ──────────────────────────────────────────────────

pattern!(
    LOCATION_PREP,
    r"\b(?i:in|for|at|near)\s+([A-Z][a-zA-Z]*(?:\s+[A-Z][a-zA-Z]*)*)"
);
pattern!(
    LOCATION_BEFORE,
    r"([A-Z][a-zA-Z]*(?:\s+[A-Z][a-zA-Z]*)*)\s+(?i:weather|forecast)"
);
pattern!(
    RECIPIENT,
    r"\b(?i:to|text|message|tell|let|wish|email)\s+([A-Z][a-z]+)"
);
pattern!(PRONOUN, r"(?i)\b(?:him|her|them)\b");
pattern!(SAYING, r"(?i)\b(?:saying|says)\s+(.+)");
pattern!(
    LET_KNOW,
    r"(?i)\blet\s+\w+\s+know\s+(?:about\s+|that\s+)?(.+)"
);
pattern!(WISH, r"(?i)\bwish\s+\w+\s+(.+)");
pattern!(THAT, r"(?i)\bthat\s+(.+)");
pattern!(
    REMINDER_TITLE_AT,
    r"(?i)\b(?:remind\s+me\s+(?:about|to)|remember\s+to)\s+(?:the\s+)?(.+?)\s+(?:at|by|on)\s+\d"
);
pattern!(
    REMINDER_TITLE,
    r"(?i)\b(?:remind\s+me\s+(?:about|to)|remember\s+to)\s+(?:the\s+)?(.+)"
);
pattern!(
    CONTACT_QUERY,
    r"\b(?i:find|look\s+up|search\s+for|search)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)"
);
pattern!(SONG, r"(?i)\bplay\s+(some\s+)?(.+)");
pattern!(MINUTES, format!(r"(?i)\b({NUMBER})[\s-]*min(?:ute)?s?\b"));
pattern!(HOURS, format!(r"(?i)\b({NUMBER})[\s-]*hours?\b"));
pattern!(
    ROOM_BEFORE,
    r"(?i)\b(?:the|my)\s+([a-z]+(?:\s+room)?)\s+lights?\b"
);
pattern!(
    ROOM_AFTER,
    r"(?i)\blights?\s+(?:in|on)\s+(?:the\s+)?([a-z]+(?:\s+room)?)"
);
pattern!(
    DESTINATION,
    r"(?i)\b(?:directions|navigate|route|way)\s+to\s+(?:the\s+)?(.+)"
);
pattern!(
    CUISINE_BEFORE,
    r"(?i)\b([a-z]+)\s+(?:restaurants?|food|cuisine|place)\b"
);
pattern!(CUISINE_EAT, r"(?i)\beat\s+(?:some\s+)?([a-z]+)");
pattern!(
    WORKOUT_DURATION_FIRST,
    format!(r"(?i)\b({NUMBER})[\s-]*min(?:ute)?s?\s+(?:of\s+)?([a-z]+)")
);
pattern!(
    WORKOUT_ACTIVITY_FIRST,
    format!(r"(?i)\b([a-z]+)\s+(?:workout\s+|session\s+)?for\s+({NUMBER})[\s-]*min")
);
pattern!(
    EVENT_TITLE_AT,
    r"(?i)\b(?:called|titled|named)\s+(.+?)\s+(?:at|on|for)\s+\d"
);
pattern!(EVENT_TITLE, r"(?i)\b(?:called|titled|named)\s+(.+)");
pattern!(
    TRANSLATION,
    r"(?i)\btranslate\s+(.+?)\s+(?:to|into)\s+([A-Za-z]+)"
);
pattern!(
    NOTE_TITLED,
    r"(?i)\b(?:called|titled|named)\s+(.+?)\s+(?:with\s+(?:the\s+)?content|saying|that\s+says)\s+(.+)"
);
pattern!(NOTE_BODY, r"(?i)\bnote\s+(?:that\s+|saying\s+|of\s+)?(.+)");
pattern!(
    CART_ITEM,
    format!(
        r"(?i)\badd\s+(?:({NUMBER})\s+)?(.+?)\s+to\s+(?:the\s+|my\s+)?(?:shopping\s+)?(?:cart|basket)"
    )
);
pattern!(
    ORDER_ID,
    r"(?i)\border\s*(?:#|number|id|no\.?)?\s*#?\s*([A-Za-z0-9-]*\d[A-Za-z0-9-]*)"
);
pattern!(
    RIDE_TYPE,
    r"(?i)\b(economy|premium|standard|shared|pool|xl|luxury|comfort)\b"
);
pattern!(
    RIDE_DESTINATION,
    r"(?i)\b(?:ride|taxi|cab|uber|lyft)\s+to\s+(?:the\s+)?(.+)"
);
pattern!(
    DOOR,
    r"(?i)\block\s+(?:up\s+)?(?:the\s+|my\s+)?((?:[a-z]+\s+)?door)\b"
);
pattern!(
    NEWS_TOPIC_BEFORE,
    r"(?i)\b([a-z]+)\s+(?:news|headlines)\b"
);
pattern!(
    NEWS_TOPIC_AFTER,
    r"(?i)\b(?:news|headlines)\s+(?:about|on|for)\s+(?:the\s+)?(.+)"
);
pattern!(
    CONVERSION,
    r"(?i)(\$)?([\d,]*\.?\d+)\s*([a-z]{3}\b|dollars?|euros?|pounds?|yen)?\s+(?:to|into|in)\s+([a-z]{3}\b|dollars?|euros?|pounds?|yen)"
);

/// Words that precede a keyword without naming anything.
const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "some", "good", "nice", "latest", "top", "today's", "breaking", "nearby",
    "local", "best", "my", "any",
];

pub fn rules() -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::new("get_weather", WEATHER.clone(), weather),
        ExtractionRule::new("set_alarm", ALARM.clone(), alarm),
        ExtractionRule::new("send_message", MESSAGE.clone(), message),
        ExtractionRule::new("create_reminder", REMINDER.clone(), reminder),
        ExtractionRule::new("search_contacts", CONTACTS.clone(), search_contacts),
        ExtractionRule::new("play_music", MUSIC.clone(), play_music),
        ExtractionRule::new("set_timer", TIMER.clone(), timer),
        ExtractionRule::new("turn_on_light", LIGHT.clone(), light),
        ExtractionRule::new("set_thermostat", THERMOSTAT.clone(), thermostat),
        ExtractionRule::new("get_directions", DIRECTIONS.clone(), directions),
        ExtractionRule::new("find_restaurant", RESTAURANT.clone(), restaurant),
        ExtractionRule::new("log_workout", WORKOUT.clone(), workout),
        ExtractionRule::new("create_event", EVENT.clone(), event),
        ExtractionRule::new("translate_text", TRANSLATE.clone(), translate),
        ExtractionRule::new("take_note", NOTE.clone(), note),
        ExtractionRule::new("add_to_cart", CART.clone(), cart),
        ExtractionRule::new("check_order_status", ORDER.clone(), order_status),
        ExtractionRule::new("book_ride", RIDE.clone(), ride),
        ExtractionRule::new("set_volume", VOLUME.clone(), volume),
        ExtractionRule::new("lock_door", LOCK.clone(), lock_door),
        ExtractionRule::new("read_news", NEWS.clone(), news),
        ExtractionRule::new("convert_currency", CURRENCY.clone(), currency),
    ]
}

fn is_filler(word: &str) -> bool {
    FILLER_WORDS.contains(&word.to_lowercase().as_str())
}

fn weather(text: &str) -> Arguments {
    let clause = clause_for(text, &WEATHER);
    let location = capture(&LOCATION_PREP, clause, 1)
        .or_else(|| capture(&LOCATION_BEFORE, clause, 1))
        .or_else(|| capture(&LOCATION_PREP, text, 1))
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "location", location);
    args
}

fn alarm(text: &str) -> Arguments {
    let clause = clause_for(text, &ALARM);
    let (hour, minute) = find_clock_time(clause)
        .map(|t| (t.hour24(), t.minute))
        .unwrap_or((8, 0));
    let mut args = Arguments::new();
    set(&mut args, "hour", hour);
    set(&mut args, "minute", minute);
    args
}

/// Contact named by a find/look-up phrase anywhere in the utterance.
fn contact_name(text: &str) -> Option<&str> {
    capture(&CONTACT_QUERY, text, 1)
}

fn message(text: &str) -> Arguments {
    let clause = clause_for(text, &MESSAGE);
    let recipient = capture(&RECIPIENT, clause, 1)
        .or_else(|| {
            PRONOUN
                .is_match(clause)
                .then(|| contact_name(text))
                .flatten()
        })
        .or_else(|| capture(&RECIPIENT, text, 1))
        .unwrap_or(UNKNOWN);
    let body = capture(&SAYING, clause, 1)
        .or_else(|| capture(&LET_KNOW, clause, 1))
        .or_else(|| capture(&WISH, clause, 1))
        .or_else(|| capture(&THAT, clause, 1))
        .map(clean)
        .unwrap_or("");
    let mut args = Arguments::new();
    set(&mut args, "recipient", recipient);
    set(&mut args, "message", body);
    args
}

fn reminder(text: &str) -> Arguments {
    let clause = clause_for(text, &REMINDER);
    let title = capture(&REMINDER_TITLE_AT, clause, 1)
        .or_else(|| capture(&REMINDER_TITLE, clause, 1))
        .map(clean)
        .unwrap_or(UNKNOWN);
    let time = find_clock_time(clause)
        .map(|t| t.display())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mut args = Arguments::new();
    set(&mut args, "title", title);
    set(&mut args, "time", time);
    args
}

fn search_contacts(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(&mut args, "query", contact_name(text).unwrap_or(UNKNOWN));
    args
}

fn play_music(text: &str) -> Arguments {
    let clause = clause_for(text, &MUSIC);
    let song = SONG
        .captures(clause)
        .and_then(|caps| {
            let song = clean(caps.get(2)?.as_str());
            if caps.get(1).is_some() {
                let trimmed = song
                    .strip_suffix(" music")
                    .or_else(|| song.strip_suffix(" Music"))
                    .unwrap_or(song);
                Some(trimmed.trim())
            } else {
                Some(song)
            }
        })
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "song", song);
    args
}

fn timer(text: &str) -> Arguments {
    let clause = clause_for(text, &TIMER);
    let minutes = capture(&MINUTES, clause, 1)
        .and_then(parse_number)
        .or_else(|| {
            capture(&HOURS, clause, 1)
                .and_then(parse_number)
                .map(|h| h.saturating_mul(60))
        })
        .unwrap_or(5);
    let mut args = Arguments::new();
    set(&mut args, "minutes", minutes);
    args
}

fn light(text: &str) -> Arguments {
    let clause = clause_for(text, &LIGHT);
    let room = capture(&ROOM_BEFORE, clause, 1)
        .or_else(|| capture(&ROOM_AFTER, clause, 1))
        .filter(|r| !is_filler(r))
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "room", room);
    args
}

fn thermostat(text: &str) -> Arguments {
    let clause = clause_for(text, &THERMOSTAT);
    let mut args = Arguments::new();
    set(&mut args, "temperature", first_integer(clause).unwrap_or(70));
    args
}

fn directions(text: &str) -> Arguments {
    let clause = clause_for(text, &DIRECTIONS);
    let mut args = Arguments::new();
    set(
        &mut args,
        "destination",
        capture(&DESTINATION, clause, 1).map(clean).unwrap_or(UNKNOWN),
    );
    args
}

fn restaurant(text: &str) -> Arguments {
    let clause = clause_for(text, &RESTAURANT);
    let cuisine = CUISINE_BEFORE
        .captures_iter(clause)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|w| !is_filler(w))
        .or_else(|| capture(&CUISINE_EAT, clause, 1).filter(|w| !is_filler(w)))
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "cuisine", cuisine);
    args
}

fn workout(text: &str) -> Arguments {
    let clause = clause_for(text, &WORKOUT_KEYWORD);
    let (duration, activity) = if let Some(caps) = WORKOUT_DURATION_FIRST.captures(clause) {
        (
            caps.get(1).and_then(|m| parse_number(m.as_str())),
            caps.get(2).map(|m| m.as_str()),
        )
    } else if let Some(caps) = WORKOUT_ACTIVITY_FIRST.captures(clause) {
        (
            caps.get(2).and_then(|m| parse_number(m.as_str())),
            caps.get(1).map(|m| m.as_str()),
        )
    } else {
        (None, None)
    };
    let mut args = Arguments::new();
    set(
        &mut args,
        "activity",
        activity.filter(|a| !is_filler(a)).unwrap_or(UNKNOWN),
    );
    set(&mut args, "duration", duration.unwrap_or(30));
    args
}

fn event(text: &str) -> Arguments {
    let clause = clause_for(text, &EVENT);
    let title = capture(&EVENT_TITLE_AT, clause, 1)
        .or_else(|| capture(&EVENT_TITLE, clause, 1))
        .map(clean)
        .unwrap_or(UNKNOWN);
    let time = find_clock_time(clause)
        .map(|t| t.display())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mut args = Arguments::new();
    set(&mut args, "title", title);
    set(&mut args, "time", time);
    args
}

fn translate(text: &str) -> Arguments {
    let clause = clause_for(text, &TRANSLATE);
    let caps = TRANSLATION.captures(clause);
    let phrase = caps
        .as_ref()
        .and_then(|c| c.get(1))
        .map(|m| clean(m.as_str()).trim_matches('\''))
        .unwrap_or(UNKNOWN);
    let language = caps
        .as_ref()
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "text", phrase);
    set(&mut args, "language", language);
    args
}

fn note(text: &str) -> Arguments {
    let clause = clause_for(text, &NOTE);
    let mut args = Arguments::new();
    if let Some(caps) = NOTE_TITLED.captures(clause) {
        let title = caps.get(1).map(|m| clean(m.as_str())).unwrap_or(UNKNOWN);
        let content = caps.get(2).map(|m| clean(m.as_str())).unwrap_or("");
        set(&mut args, "title", title);
        set(&mut args, "content", content);
    } else {
        let content = capture(&NOTE_BODY, clause, 1).map(clean).unwrap_or("");
        set(&mut args, "title", UNKNOWN);
        set(&mut args, "content", content);
    }
    args
}

fn cart(text: &str) -> Arguments {
    let clause = clause_for(text, &CART);
    let caps = CART_ITEM.captures(clause);
    let quantity = caps
        .as_ref()
        .and_then(|c| c.get(1))
        .and_then(|m| parse_number(m.as_str()))
        .unwrap_or(1);
    let item = caps
        .as_ref()
        .and_then(|c| c.get(2))
        .map(|m| clean(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "item", item);
    set(&mut args, "quantity", quantity);
    args
}

fn order_status(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(
        &mut args,
        "order_id",
        capture(&ORDER_ID, text, 1).unwrap_or(UNKNOWN),
    );
    args
}

fn ride(text: &str) -> Arguments {
    let clause = clause_for(text, &RIDE);
    let ride_type = capture(&RIDE_TYPE, clause, 1)
        .map(str::to_lowercase)
        .unwrap_or_else(|| "economy".to_string());
    let destination = capture(&RIDE_DESTINATION, clause, 1)
        .map(clean)
        .unwrap_or(UNKNOWN);
    let mut args = Arguments::new();
    set(&mut args, "destination", destination);
    set(&mut args, "ride_type", ride_type);
    args
}

fn volume(text: &str) -> Arguments {
    let clause = clause_for(text, &VOLUME);
    let level = first_integer(clause).unwrap_or(50).clamp(0, 100);
    let mut args = Arguments::new();
    set(&mut args, "level", level);
    args
}

fn lock_door(text: &str) -> Arguments {
    let clause = clause_for(text, &LOCK);
    let mut args = Arguments::new();
    set(
        &mut args,
        "door",
        capture(&DOOR, clause, 1).unwrap_or("front door"),
    );
    args
}

fn news(text: &str) -> Arguments {
    let clause = clause_for(text, &NEWS);
    let topic = capture(&NEWS_TOPIC_AFTER, clause, 1)
        .map(clean)
        .or_else(|| {
            NEWS_TOPIC_BEFORE
                .captures_iter(clause)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .find(|w| !is_filler(w))
        })
        .unwrap_or("general");
    let mut args = Arguments::new();
    set(&mut args, "topic", topic);
    args
}

fn currency_code(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match lowered.trim_end_matches('s') {
        "dollar" | "$" => "USD".into(),
        "euro" => "EUR".into(),
        "pound" => "GBP".into(),
        "yen" => "JPY".into(),
        _ => raw.to_uppercase(),
    }
}

fn currency(text: &str) -> Arguments {
    let clause = clause_for(text, &CURRENCY);
    let mut args = Arguments::new();
    match CONVERSION.captures(clause) {
        Some(caps) => {
            let amount = caps
                .get(2)
                .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
                .unwrap_or(1.0);
            let from = match (caps.get(3), caps.get(1)) {
                (Some(code), _) => currency_code(code.as_str()),
                (None, Some(_)) => "USD".to_string(),
                (None, None) => UNKNOWN.to_string(),
            };
            let to = caps
                .get(4)
                .map(|m| currency_code(m.as_str()))
                .unwrap_or_else(|| UNKNOWN.to_string());
            set(&mut args, "amount", amount);
            set(&mut args, "from_currency", from);
            set(&mut args, "to_currency", to);
        }
        None => {
            set(&mut args, "amount", 1.0);
            set(&mut args, "from_currency", UNKNOWN);
            set(&mut args, "to_currency", UNKNOWN);
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_location_forms() {
        assert_eq!(weather("What is the weather in San Francisco?")["location"], "San Francisco");
        assert_eq!(weather("What's the weather like in London?")["location"], "London");
        assert_eq!(weather("How's the New York weather today?")["location"], "New York");
        assert_eq!(weather("Is it going to rain in Tokyo tomorrow?")["location"], "Tokyo");
        assert_eq!(weather("weather please")["location"], UNKNOWN);
    }

    #[test]
    fn alarm_times() {
        let args = alarm("Set an alarm for 8:15 AM.");
        assert_eq!((args["hour"].as_u64(), args["minute"].as_u64()), (Some(8), Some(15)));
        let args = alarm("Wake me up at 6 AM.");
        assert_eq!(args["hour"], 6);
        let args = alarm("Set an alarm for 6:45 AM and remind me to take medicine at 7:00 AM.");
        assert_eq!((args["hour"].as_u64(), args["minute"].as_u64()), (Some(6), Some(45)));
    }

    #[test]
    fn message_recipient_and_body() {
        let args = message("Text Dave saying I'll be late.");
        assert_eq!(args["recipient"], "Dave");
        assert_eq!(args["message"], "I'll be late");

        let args = message("Let Alice know I'll be there at 5.");
        assert_eq!(args["recipient"], "Alice");
        assert_eq!(args["message"], "I'll be there at 5");
    }

    #[test]
    fn message_pronoun_resolves_to_contact() {
        let args = message("Find Tom in my contacts and send him a message saying happy birthday.");
        assert_eq!(args["recipient"], "Tom");
        assert_eq!(args["message"], "happy birthday");

        let args = message("Look up Maria and wish her happy birthday.");
        assert_eq!(args["recipient"], "Maria");
        assert_eq!(args["message"], "happy birthday");
    }

    #[test]
    fn reminder_title_and_time() {
        let args = reminder("Remind me to call the dentist at 2:00 PM.");
        assert_eq!(args["title"], "call the dentist");
        assert_eq!(args["time"], "2:00 PM");

        let args = reminder("I need to remember to buy milk at 4 PM and let Sarah know about dinner.");
        assert_eq!(args["title"], "buy milk");
        assert_eq!(args["time"], "4:00 PM");
    }

    #[test]
    fn play_strips_music_only_after_some() {
        assert_eq!(play_music("Play some jazz music.")["song"], "jazz");
        assert_eq!(play_music("play classical music")["song"], "classical music");
        assert_eq!(play_music("Play Bohemian Rhapsody.")["song"], "Bohemian Rhapsody");
    }

    #[test]
    fn timer_reads_its_own_clause() {
        assert_eq!(timer("Log a 20 minute yoga workout and set a timer for 5 minutes.")["minutes"], 5);
        assert_eq!(timer("Set a 15 minute timer, play classical music")["minutes"], 15);
        assert_eq!(timer("Set a timer for twenty five minutes.")["minutes"], 25);
    }

    #[test]
    fn smart_home_slots() {
        assert_eq!(light("Turn on the living room light")["room"], "living room");
        assert_eq!(light("turn on the lights in the garage")["room"], "garage");
        assert_eq!(thermostat("Set the thermostat to 72.")["temperature"], 72);
        assert_eq!(volume("set the volume to 80")["level"], 80);
        assert_eq!(lock_door("lock the back door.")["door"], "back door");
    }

    #[test]
    fn travel_and_food_slots() {
        assert_eq!(
            directions("Get directions to San Francisco International Airport.")["destination"],
            "San Francisco International Airport"
        );
        assert_eq!(restaurant("Find an Italian restaurant")["cuisine"], "Italian");
        assert_eq!(restaurant("Find somewhere good to eat sushi nearby.")["cuisine"], "sushi");
        let args = ride("Book a premium ride to the train station and text Carlos");
        assert_eq!(args["destination"], "train station");
        assert_eq!(args["ride_type"], "premium");
        assert_eq!(ride("get me a cab to downtown")["ride_type"], "economy");
    }

    #[test]
    fn productivity_slots() {
        let args = workout("Log a 45 minute cycling workout, play upbeat electronic");
        assert_eq!(args["activity"], "cycling");
        assert_eq!(args["duration"], 45);

        let args = event("Create an event called lunch with Sarah at 12:00 PM and set a timer");
        assert_eq!(args["title"], "lunch with Sarah");
        assert_eq!(args["time"], "12:00 PM");

        let args = translate("Translate hello to Spanish and take a note");
        assert_eq!(args["text"], "hello");
        assert_eq!(args["language"], "Spanish");

        let args = note("take a note called greetings with content basic phrases.");
        assert_eq!(args["title"], "greetings");
        assert_eq!(args["content"], "basic phrases");
    }

    #[test]
    fn shopping_slots() {
        let args = cart("Add 2 batteries to the cart");
        assert_eq!(args["item"], "batteries");
        assert_eq!(args["quantity"], 2);
        assert_eq!(cart("add milk to my basket")["quantity"], 1);
        assert_eq!(order_status("check the status of order #A1234")["order_id"], "A1234");
    }

    #[test]
    fn news_and_currency() {
        assert_eq!(news("Read the latest sports news")["topic"], "sports");
        assert_eq!(news("headlines about the election")["topic"], "election");
        let args = currency("convert 100 dollars to euros");
        assert_eq!(args["amount"], 100.0);
        assert_eq!(args["from_currency"], "USD");
        assert_eq!(args["to_currency"], "EUR");
        let args = currency("convert $1,250.50 to GBP");
        assert_eq!(args["amount"], 1250.5);
        assert_eq!(args["from_currency"], "USD");
        assert_eq!(args["to_currency"], "GBP");
    }
}
