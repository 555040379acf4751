use anyhow::Result;

/// The CLI is a single prompt loop doing one request at a time, so a current-thread
/// runtime is all it needs.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
