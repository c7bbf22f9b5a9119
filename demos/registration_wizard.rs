//! Registration Wizard
//!
//! This example walks a simulated chat user through a sign-up form.
//!
//! Key concepts:
//! - Steps with required fields and a conditional step (guardian consent for minors)
//! - Sessions kept in a session store between "messages"
//! - Checkpoint to JSON and resume
//! - Completion hook that can reject the submission
//!
//! Run with: RUST_LOG=stepwise=debug cargo run --example registration_wizard

use serde_json::Value;
use stepwise::builder::{FormBuilder, StepBuilder};
use stepwise::checkpoint::Checkpoint;
use stepwise::core::{ErrorMap, FormData};
use stepwise::field::FieldSchema;
use stepwise::form::{MultiStepForm, SubmitResult};
use stepwise::form_data;
use stepwise::session::{InMemorySessionStore, SessionKey, SessionStore};

const USER: i64 = 1001;
const CHAT: i64 = 55;

fn registration_form() -> MultiStepForm {
    FormBuilder::new("registration", "Create your account")
        .description("Three quick questions")
        .step(
            StepBuilder::new("profile", "About you")
                .field(FieldSchema::text("name", "Name").required().min_length(2))
                .field(FieldSchema::number("age", "Age").required().range(5.0, 120.0)),
        )
        .expect("profile step")
        .step(
            StepBuilder::new("guardian", "Guardian consent")
                .when(|data: &FormData| data.get("age").and_then(Value::as_f64).is_some_and(|age| age < 18.0))
                .field(FieldSchema::text("guardian_email", "Guardian email").required()),
        )
        .expect("guardian step")
        .step(
            StepBuilder::new("plan", "Pick a plan")
                .field(FieldSchema::select("plan", "Plan", ["free", "pro"]).required()),
        )
        .expect("plan step")
        .on_step_change(|from, to, _| {
            println!("  [hook] step {from} -> {to}");
            Ok(())
        })
        .on_complete(|data| {
            // Pretend the backend only has room for free accounts today
            if data.get("plan").and_then(Value::as_str) == Some("pro") {
                let mut errors = ErrorMap::new();
                errors.insert("plan".to_string(), "Pro signups are paused".to_string());
                return Ok(SubmitResult::rejected(errors));
            }
            Ok(SubmitResult::accepted())
        })
        .build()
        .expect("registration form")
}

// One chat message: load the session, apply input, advance, store.
fn handle_message(form: &MultiStepForm, store: &InMemorySessionStore, input: FormData) {
    let key = SessionKey::new(USER, CHAT, form.id());
    let state = store
        .get(&key)
        .unwrap_or_else(|| form.create_initial_state(USER, CHAT));

    let step = form.current_step(&state).map(|s| s.title().to_string()).unwrap_or_default();
    println!("> [{step}] {}", Value::Object(input.clone()));

    let state = form
        .update_current_step(&state, &input)
        .expect("state belongs to this form");
    if let Some(errors) = state.current_step_state().and_then(|s| s.errors.clone()) {
        for (field, message) in errors {
            println!("  ! {field}: {message}");
        }
    }

    let state = form.move_to_next_step(&state).unwrap_or(state);
    let tracker = form.progress_tracker();
    println!("  {}", tracker.progress_bar(&state, 20));
    store.save(&state);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("=== Registration Wizard ===\n");

    let form = registration_form();
    let store = InMemorySessionStore::new();
    let key = SessionKey::new(USER, CHAT, form.id());

    handle_message(&form, &store, form_data! { "name" => "J" });
    handle_message(&form, &store, form_data! { "name" => "Jo", "age" => 15 });
    handle_message(&form, &store, form_data! { "guardian_email" => "parent@example.com" });

    // Simulate a restart: checkpoint, drop the session, resume
    let state = store.get(&key).expect("session exists");
    let json = Checkpoint::new(&state).to_json().expect("checkpoint serializes");
    store.delete(&key);
    let resumed = Checkpoint::from_json(&json).expect("checkpoint loads").into_state();
    store.save(&resumed);
    println!("\n  [checkpoint] resumed at step {}\n", resumed.current_step_index + 1);

    handle_message(&form, &store, form_data! { "plan" => "pro" });
    let state = store.get(&key).expect("session exists");
    let result = form.complete(&state);
    println!("\n{} -> {:?}", result.message, result.errors);

    handle_message(&form, &store, form_data! { "plan" => "free" });
    let state = store.get(&key).expect("session exists");
    let result = form.complete(&state);
    println!("{}", result.message);

    if result.success {
        store.save(&state.mark_complete());
    }
    println!("\n{}", form.summary(&state));
    println!("Active sessions for user: {}", store.active_for_user(USER).len());
}
