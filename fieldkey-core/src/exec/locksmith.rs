//! Mock field-service handlers for the locksmith catalog.
//!
//! Results are canned but shaped like a real back office would answer, with
//! generated reference ids (`SR-`, `APT-`, `DSP-`, `INV-`).

use rand::Rng;
use serde_json::{json, Value};

use super::{ExecutionError, HandlerTable};
use crate::tools::Arguments;

/// Handlers for all seven locksmith tools.
pub fn locksmith_handlers() -> HandlerTable {
    HandlerTable::new()
        .with("diagnose_lock_fault", diagnose)
        .with("log_service_report", service_report)
        .with("generate_checklist", checklist)
        .with("lookup_part", lookup_part)
        .with("schedule_followup", schedule_followup)
        .with("contact_dispatch", contact_dispatch)
        .with("generate_invoice", generate_invoice)
}

/// String form of `key`, or `default` when absent or null.
fn arg(args: &Arguments, key: &str, default: &str) -> String {
    match args.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `prefix` followed by `digits` uppercase hex digits.
fn reference_id(prefix: &str, digits: usize) -> String {
    let n: u64 = rand::thread_rng().gen();
    let hex = format!("{n:016X}");
    format!("{prefix}-{}", &hex[..digits.min(16)])
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

fn diagnose(args: &Arguments) -> Result<Value, ExecutionError> {
    Ok(json!({
        "diagnosis": "Likely worn tailpiece or misaligned strike plate",
        "location": arg(args, "location", "door"),
        "symptoms_confirmed": arg(args, "symptoms", "issue"),
        "lock_type": arg(args, "lock_type", "deadbolt"),
        "recommended_action": "Remove cylinder, inspect tailpiece for wear. Check strike plate alignment with 1/8\" tolerance.",
        "estimated_time": "25-35 minutes",
        "parts_needed": ["Replacement tailpiece", "Strike plate shims"],
        "difficulty": "moderate",
    }))
}

fn service_report(args: &Arguments) -> Result<Value, ExecutionError> {
    Ok(json!({
        "status": "logged",
        "report_id": reference_id("SR", 8),
        "customer": arg(args, "customer_name", ""),
        "service": arg(args, "service_type", ""),
        "timestamp": now(),
        "notes": arg(args, "notes", "No additional notes"),
    }))
}

fn checklist_items(job_type: &str) -> &'static [&'static str] {
    match job_type {
        "residential rekey" => &[
            "Verify customer ID and ownership/authorization",
            "Count total locks to be rekeyed",
            "Check existing keyway (SC1, KW1, etc.)",
            "Prepare pinning kit with correct depths",
            "Test all locks before and after rekey",
            "Provide new keys and test each one",
            "Document key bitting for records",
        ],
        "commercial install" => &[
            "Review building codes and fire marshal requirements",
            "Verify door prep dimensions",
            "Check for ADA compliance requirements",
            "Confirm master key system compatibility",
            "Install hardware per manufacturer specs",
            "Test panic hardware and auto-closers",
            "Provide documentation to building manager",
        ],
        "auto lockout" => &[
            "Verify vehicle ownership (registration/ID)",
            "Identify vehicle make, model, and year",
            "Select appropriate entry tool",
            "Protect paint and weather stripping",
            "Attempt non-destructive entry first",
            "Test all doors after entry",
            "Document any pre-existing damage",
        ],
        _ => &[
            "Verify job scope with customer",
            "Inspect existing hardware",
            "Prepare tools and parts",
            "Perform service",
            "Test and verify completion",
            "Clean work area",
            "Collect payment and provide receipt",
        ],
    }
}

fn checklist(args: &Arguments) -> Result<Value, ExecutionError> {
    let job_type = arg(args, "job_type", "general").to_lowercase();
    Ok(json!({
        "job_type": job_type,
        "checklist": checklist_items(&job_type),
    }))
}

fn lookup_part(args: &Arguments) -> Result<Value, ExecutionError> {
    let query = arg(args, "query", "");
    let brand = arg(args, "brand", "Generic");
    Ok(json!({
        "part": query,
        "brand": brand,
        "found": true,
        "description": format!("{brand} {query}"),
        "price_range": "$4.50 - $12.00",
        "in_stock": true,
        "compatible_models": ["B60N", "B62N", "B560P"],
        "supplier": "Lock Supply Co.",
        "notes": "Standard 6-pin key blank, available in brass and nickel silver",
    }))
}

fn schedule_followup(args: &Arguments) -> Result<Value, ExecutionError> {
    Ok(json!({
        "status": "scheduled",
        "appointment_id": reference_id("APT", 6),
        "customer": arg(args, "customer_name", ""),
        "date": arg(args, "date", ""),
        "reason": arg(args, "reason", "Follow-up service"),
        "confirmation": "Customer will receive SMS confirmation",
    }))
}

fn contact_dispatch(args: &Arguments) -> Result<Value, ExecutionError> {
    let urgency = arg(args, "urgency", "medium");
    let eta = match urgency.as_str() {
        "high" | "emergency" => "10-15 minutes",
        _ => "20-30 minutes",
    };
    Ok(json!({
        "status": "dispatched",
        "dispatch_id": reference_id("DSP", 6),
        "reason": arg(args, "reason", ""),
        "urgency": urgency,
        "eta": eta,
        "dispatcher": "Central Dispatch",
        "confirmation": "Dispatch notified and backup en route",
    }))
}

fn generate_invoice(args: &Arguments) -> Result<Value, ExecutionError> {
    let invoice_id = reference_id("INV", 6);
    Ok(json!({
        "status": "generated",
        "pdf_url": format!("/api/invoice/{invoice_id}"),
        "invoice_id": invoice_id,
        "customer": arg(args, "customer_name", "Customer"),
        "service": arg(args, "service_type", "Locksmith Service"),
        "amount": arg(args, "amount", "$150.00"),
        "notes": arg(args, "notes", ""),
        "timestamp": now(),
    }))
}
