// Library root
// -----------
// This crate exposes a small library surface for the owner-admin
// provisioning CLI. The binary (`main.rs`) uses these modules to run the
// interactive flow.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the Shiftly backend
//   (login, building/department resolve-or-create, employee creation).
// - `ui`: Implements the terminal prompts and the provisioning flow,
//   delegating requests to `api`.
//
// Keeping this separation lets the API logic be exercised against a mock
// server without driving the interactive prompts.
pub mod api;
pub mod ui;
