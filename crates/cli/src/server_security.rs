use anyhow::{Context as AnyhowContext, Result};
use std::net::SocketAddr;

/// Resolve `--bind` and refuse any address a remote client could reach
/// unless `--public` was given.
pub(crate) async fn checked_bind_addrs(bind: &str, public: bool) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(bind)
        .await
        .with_context(|| format!("Cannot resolve --bind {bind}"))?
        .collect();
    if addrs.is_empty() {
        anyhow::bail!("--bind {bind} did not resolve to any address");
    }

    if !public {
        if let Some(exposed) = first_exposed(&addrs) {
            anyhow::bail!(
                "Refusing to bind {exposed} (from --bind {bind}) without --public: the search API has no authentication"
            );
        }
    }
    Ok(addrs)
}

fn first_exposed(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs.iter().copied().find(|addr| !addr.ip().is_loopback())
}
