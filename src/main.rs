// Entrypoint for the provisioning CLI.
// - Keeps `main` small: create an API client and hand it to the flow.
// - Returning `anyhow::Result` means transport failures surface as a
//   printed error and a non-zero exit instead of a bare panic.

use shiftly_admin_cli::{api::ApiClient, ui::run};

fn main() -> anyhow::Result<()> {
    // Base URL comes from `SHIFTLY_API_URL` (default: the production
    // API); `SHIFTLY_HTTP_TIMEOUT_SECS` optionally bounds each request.
    let api = ApiClient::from_env()?;

    // Runs the whole interactive flow; blocks until it completes.
    run(api)?;
    Ok(())
}
