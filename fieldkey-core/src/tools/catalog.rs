//! Built-in tool catalogs.
//!
//! - [`locksmith_tools`]: the field-service catalog served by the host app.
//! - [`assistant_tools`]: personal-assistant tools used by the benchmark suites.

use super::ToolSchema;

/// Field-service tools for a working locksmith.
pub fn locksmith_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "diagnose_lock_fault",
            "Diagnose a lock or door hardware fault based on symptoms described by the locksmith",
        )
        .required(
            "location",
            "string",
            "Door or lock location (e.g. front door, garage, unit 4B)",
        )
        .required(
            "symptoms",
            "string",
            "Observed symptoms (e.g. jammed, won't turn, loose cylinder)",
        )
        .optional(
            "lock_type",
            "string",
            "Type of lock if known (e.g. deadbolt, knob lock, mortise, padlock)",
        ),
        ToolSchema::new(
            "log_service_report",
            "Log a completed service report for a locksmith job",
        )
        .required("customer_name", "string", "Customer name")
        .required(
            "service_type",
            "string",
            "Type of service performed (e.g. rekey, lock change, lockout, install)",
        )
        .optional("notes", "string", "Additional notes about the job"),
        ToolSchema::new(
            "generate_checklist",
            "Generate a pre-job or safety checklist for a locksmith task",
        )
        .required(
            "job_type",
            "string",
            "Type of job (e.g. residential rekey, commercial install, auto lockout)",
        ),
        ToolSchema::new(
            "lookup_part",
            "Look up a lock part, key blank, or hardware component by name or model number",
        )
        .required("query", "string", "Part name or model number to search for")
        .optional(
            "brand",
            "string",
            "Brand name if known (e.g. Schlage, Kwikset, Yale)",
        ),
        ToolSchema::new(
            "schedule_followup",
            "Schedule a follow-up appointment with a customer",
        )
        .required("customer_name", "string", "Customer name")
        .required(
            "date",
            "string",
            "Preferred date (e.g. next Tuesday, March 15)",
        )
        .optional("reason", "string", "Reason for follow-up"),
        ToolSchema::new(
            "contact_dispatch",
            "Contact dispatch for backup, additional tools, or emergency coordination",
        )
        .required("reason", "string", "Reason for contacting dispatch")
        .optional(
            "urgency",
            "string",
            "Urgency level: low, medium, high, emergency",
        ),
        ToolSchema::new(
            "generate_invoice",
            "Generate a professional PDF invoice for a completed locksmith service job",
        )
        .required("customer_name", "string", "Customer name for the invoice")
        .required(
            "service_type",
            "string",
            "Type of service performed (e.g. rekey, lock change, lockout, install)",
        )
        .optional(
            "amount",
            "string",
            "Total amount to charge (e.g. $150.00)",
        )
        .optional("notes", "string", "Additional line items or notes"),
    ]
}

/// Personal-assistant tools.
pub fn assistant_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new("get_weather", "Get current weather for a location")
            .required("location", "string", "City name"),
        ToolSchema::new("set_alarm", "Set an alarm for a given time")
            .required("hour", "integer", "Hour to set the alarm for")
            .required("minute", "integer", "Minute to set the alarm for"),
        ToolSchema::new("send_message", "Send a message to a contact")
            .required(
                "recipient",
                "string",
                "Name of the person to send the message to",
            )
            .required("message", "string", "The message content to send"),
        ToolSchema::new("create_reminder", "Create a reminder with a title and time")
            .required("title", "string", "Reminder title")
            .required(
                "time",
                "string",
                "Time for the reminder (e.g. 3:00 PM)",
            ),
        ToolSchema::new("search_contacts", "Search for a contact by name")
            .required("query", "string", "Name to search for"),
        ToolSchema::new("play_music", "Play a song or playlist")
            .required("song", "string", "Song or playlist name"),
        ToolSchema::new("set_timer", "Set a countdown timer")
            .required("minutes", "integer", "Number of minutes"),
        ToolSchema::new("turn_on_light", "Turn on a light in a specific room")
            .required("room", "string", "Room name"),
        ToolSchema::new("set_thermostat", "Set the thermostat temperature")
            .required("temperature", "integer", "Temperature in degrees"),
        ToolSchema::new("get_directions", "Get driving directions to a destination")
            .required("destination", "string", "Destination address or place"),
        ToolSchema::new("find_restaurant", "Find a restaurant nearby")
            .required("cuisine", "string", "Type of cuisine"),
        ToolSchema::new("log_workout", "Log a workout session")
            .required("activity", "string", "Type of exercise")
            .required("duration", "integer", "Duration in minutes"),
        ToolSchema::new("create_event", "Create a calendar event")
            .required("title", "string", "Event title")
            .required("time", "string", "Event time"),
        ToolSchema::new("translate_text", "Translate text to another language")
            .required("text", "string", "Text to translate")
            .required("language", "string", "Target language"),
        ToolSchema::new("add_to_cart", "Add an item to the shopping cart")
            .required("item", "string", "Product name")
            .required("quantity", "integer", "Number of items"),
        ToolSchema::new("check_order_status", "Check the status of an order")
            .required("order_id", "string", "Order ID number"),
        ToolSchema::new("book_ride", "Book a ride to a destination")
            .required("destination", "string", "Where to go")
            .required(
                "ride_type",
                "string",
                "Type of ride (economy, premium)",
            ),
        ToolSchema::new("set_volume", "Set the speaker volume level")
            .required("level", "integer", "Volume level from 0 to 100"),
        ToolSchema::new("lock_door", "Lock a specific door")
            .required("door", "string", "Which door to lock"),
        ToolSchema::new("read_news", "Read latest news headlines for a topic")
            .required("topic", "string", "News topic or category"),
        ToolSchema::new("take_note", "Save a note with a title and content")
            .required("title", "string", "Note title")
            .required("content", "string", "Note body text"),
        ToolSchema::new("convert_currency", "Convert an amount between currencies")
            .required("amount", "number", "Amount to convert")
            .required("from_currency", "string", "Source currency code")
            .required("to_currency", "string", "Target currency code"),
    ]
}

/// Pick tools by name from both catalogs, in the order given.
///
/// Unknown names are skipped.
pub fn select(names: &[&str]) -> Vec<ToolSchema> {
    let all: Vec<ToolSchema> = assistant_tools()
        .into_iter()
        .chain(locksmith_tools())
        .collect();
    names
        .iter()
        .filter_map(|name| all.iter().find(|t| t.name == *name).cloned())
        .collect()
}
