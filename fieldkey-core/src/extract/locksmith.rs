//! Locksmith field-service rules.

use super::slots::{capture, clean, set};
use super::ExtractionRule;
use crate::tools::Arguments;

// ── Activation (lowercased text) ─────────────────────────────────────────────

pattern!(
    DIAGNOSE,
    r"diagnos|jammed|stuck|broken|won.?t turn|fault|malfunction|not working|lock issue"
);
pattern!(
    REPORT,
    r"log\s+service|service\s+report|report\s+for|completed|finished\s+job"
);
pattern!(CHECKLIST, r"checklist|pre.?job|safety\s+check");
pattern!(
    PART,
    r"look\s*up|part|key\s*blank|hardware|component|model\s+number"
);
pattern!(
    FOLLOWUP,
    r"schedule|follow.?up|appointment|next\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)"
);
pattern!(
    DISPATCH,
    r"dispatch|backup|emergency|reinforcement|send\s+help"
);
pattern!(INVOICE, r"invoice|bill|charge|receipt|payment");

// ── Slots ────────────────────────────────────────────────────────────────────

pattern!(
    LOCATION,
    r"(?i)(?:on|at|for)\s+(?:the\s+)?(.+?(?:door|lock|gate|entrance|exit))"
);
pattern!(
    LOCK_TYPE,
    r"(?i)(deadbolt|knob\s*lock|mortise|padlock|smart\s*lock|lever|cylinder)"
);
pattern!(
    REPORT_CUSTOMER,
    r"(?:for|customer|client)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)"
);
pattern!(
    REPORT_SERVICE,
    r"(?i)(rekey|lockout|lock\s*change|install|repair|master\s*key)"
);
pattern!(
    JOB_TYPE,
    r"(?i)(residential\s+rekey|commercial\s+install|auto\s+lockout|rekey|lockout|install)"
);
pattern!(
    PART_QUERY,
    r"(?i)(?:look\s*up|find|search\s+for)\s+(?:a\s+)?(.+?)(?:\s+for\b|\s*$)"
);
pattern!(
    BRAND,
    r"(?i)(Schlage|Kwikset|Yale|Medeco|Mul-T-Lock|Baldwin|Sargent)"
);
pattern!(
    FOLLOWUP_CUSTOMER,
    r"(?:with|for)\s+((?:Mrs?\.?\s+|Ms\.?\s+)?[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)"
);
pattern!(
    FOLLOWUP_DATE,
    r"(?i)\b(next\s+\w+|tomorrow|today|monday|tuesday|wednesday|thursday|friday|saturday|sunday|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2})\b"
);
pattern!(
    FOLLOWUP_REASON,
    r"(?i)(?:\bfor|\bto|\babout)\s+(.+?)(?:\s+next\b|\s+on\b|\s*$)"
);
pattern!(
    DISPATCH_REASON,
    r"(?i)(?:need|require|requesting)\s+(.+?)(?:\.|$)"
);
pattern!(URGENT, r"(?i)emergency|urgent|asap|immediately");
pattern!(ASSIST, r"(?i)backup|help|assist");
pattern!(
    INVOICE_CUSTOMER,
    r"(?:for|customer|client)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"
);
pattern!(TWO_CAPITALIZED, r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)");
pattern!(
    INVOICE_SERVICE,
    r"(?i)(rekey(?:ing)?|lockout|lock\s*change|install(?:ation)?|repair|master\s*key|deadbolt|lock\s+replacement)"
);
pattern!(AMOUNT, r"\$[\d,]+(?:\.\d{2})?");
pattern!(
    NOTES,
    r"(?i)(?:notes?|memo|description)\s*:?\s*(.+?)(?:\.|$)"
);

pub const DEFAULT_CUSTOMER: &str = "Customer";
pub const DEFAULT_INVOICE_SERVICE: &str = "Locksmith Service";
pub const DEFAULT_INVOICE_AMOUNT: &str = "$150.00";

pub fn rules() -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::new("diagnose_lock_fault", DIAGNOSE.clone(), diagnose),
        ExtractionRule::new("log_service_report", REPORT.clone(), service_report),
        ExtractionRule::new("generate_checklist", CHECKLIST.clone(), checklist),
        ExtractionRule::new("lookup_part", PART.clone(), part),
        ExtractionRule::new("schedule_followup", FOLLOWUP.clone(), followup),
        ExtractionRule::new("contact_dispatch", DISPATCH.clone(), dispatch),
        ExtractionRule::new("generate_invoice", INVOICE.clone(), invoice).requiring_remote(),
    ]
}

fn diagnose(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(&mut args, "symptoms", text.trim());
    set(
        &mut args,
        "location",
        capture(&LOCATION, text, 1).unwrap_or("unknown"),
    );
    if let Some(lock_type) = capture(&LOCK_TYPE, text, 1) {
        set(&mut args, "lock_type", lock_type);
    }
    args
}

fn service_report(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(
        &mut args,
        "customer_name",
        capture(&REPORT_CUSTOMER, text, 1).unwrap_or(DEFAULT_CUSTOMER),
    );
    set(
        &mut args,
        "service_type",
        capture(&REPORT_SERVICE, text, 1).unwrap_or("service"),
    );
    args
}

fn checklist(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(
        &mut args,
        "job_type",
        capture(&JOB_TYPE, text, 1).unwrap_or("general"),
    );
    args
}

fn part(text: &str) -> Arguments {
    let mut args = Arguments::new();
    let query = capture(&PART_QUERY, text, 1)
        .map(clean)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| text.trim());
    set(&mut args, "query", query);
    if let Some(brand) = capture(&BRAND, text, 1) {
        set(&mut args, "brand", brand);
    }
    args
}

fn followup(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(
        &mut args,
        "customer_name",
        capture(&FOLLOWUP_CUSTOMER, text, 1).unwrap_or(DEFAULT_CUSTOMER),
    );
    set(
        &mut args,
        "date",
        capture(&FOLLOWUP_DATE, text, 1).unwrap_or("TBD"),
    );
    if let Some(reason) = capture(&FOLLOWUP_REASON, text, 1).map(clean) {
        if !reason.is_empty() {
            set(&mut args, "reason", reason);
        }
    }
    args
}

fn dispatch(text: &str) -> Arguments {
    let mut args = Arguments::new();
    set(
        &mut args,
        "reason",
        capture(&DISPATCH_REASON, text, 1).unwrap_or_else(|| text.trim()),
    );
    let urgency = if URGENT.is_match(text) {
        "emergency"
    } else if ASSIST.is_match(text) {
        "high"
    } else {
        "medium"
    };
    set(&mut args, "urgency", urgency);
    args
}

fn invoice(text: &str) -> Arguments {
    let mut args = Arguments::new();
    let customer = capture(&INVOICE_CUSTOMER, text, 1)
        .or_else(|| capture(&TWO_CAPITALIZED, text, 1))
        .unwrap_or(DEFAULT_CUSTOMER);
    set(&mut args, "customer_name", customer);
    set(
        &mut args,
        "service_type",
        capture(&INVOICE_SERVICE, text, 1).unwrap_or(DEFAULT_INVOICE_SERVICE),
    );
    let amount = match AMOUNT.find(text) {
        Some(m) if m.as_str().contains('.') => m.as_str().to_string(),
        Some(m) => format!("{}.00", m.as_str()),
        None => DEFAULT_INVOICE_AMOUNT.to_string(),
    };
    set(&mut args, "amount", amount);
    if let Some(notes) = capture(&NOTES, text, 1) {
        set(&mut args, "notes", notes);
    }
    args
}
