//! `repoprobe serve` command.

use crate::context::ServiceContext;
use crate::server::serve;

use super::block_on;

/// Execute the `serve` command. Blocks until the server stops.
///
/// # Errors
///
/// Returns an error string if the address cannot be bound.
pub fn run(ctx: ServiceContext, addr: &str) -> Result<(), String> {
    block_on(serve(ctx, addr))?.map_err(|e| format!("Server on {addr} failed: {e}"))
}
