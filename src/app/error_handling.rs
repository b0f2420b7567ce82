//! Error handling utilities

use tracing::error;

/// Handle fatal errors and exit with appropriate status code
///
/// - For `AggregationError`: shows the user message always, the error chain with `-v`
/// - For other errors: shows the error message and exits with 1
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    use crate::error::{describe_error_code, AggregationError};

    error!("Fatal error: {}", error);

    let exit_code = if let Some(agg_err) = error.downcast_ref::<AggregationError>() {
        eprintln!("Error: {}", agg_err.user_message());

        if verbose >= 1 {
            let code = agg_err.code();
            eprintln!("\nError code E{:04}: {}", code, describe_error_code(code));
            eprintln!("\nContext Chain:\n{}", agg_err.developer_message());
        }

        agg_err.exit_code()
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    };

    std::process::exit(exit_code)
}
