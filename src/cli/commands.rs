//! Handlers for the commands that talk to the backend.

use std::io::Write;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde_json::Value;
use tracing::info;

use crate::gateway::{ApiGateway, RequestOptions};
use crate::guard::{RouteGuard, Verdict};

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn handle_login(gateway: &ApiGateway, email: &str, password: &str) -> Result<()> {
    let user = gateway
        .login(email, password)
        .await
        .wrap_err("Login failed")?;
    print_json(&user)
}

pub fn handle_logout(gateway: &ApiGateway) -> Result<()> {
    gateway.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn handle_whoami(gateway: &ApiGateway) -> Result<()> {
    let session = gateway.session().snapshot();
    match (session.is_authenticated(), session.user()) {
        (false, _) => println!("Not signed in"),
        (true, Some(user)) => print_json(user)?,
        (true, None) => println!("Signed in (user record unavailable)"),
    }
    Ok(())
}

pub async fn handle_role(gateway: &ApiGateway, role: &str) -> Result<()> {
    let user = gateway
        .update_my_role(role)
        .await
        .wrap_err("Role update failed")?;
    print_json(&user)
}

pub async fn handle_get(gateway: &ApiGateway, path: &str) -> Result<()> {
    let value = gateway.request(path, RequestOptions::get()).await?;
    print_json(&value)
}

/// Print one JSON line per event until the server closes the stream or the
/// user presses Ctrl-C.
pub async fn handle_stream(gateway: &ApiGateway, path: &str, body: Option<&str>) -> Result<()> {
    let body: Value = match body {
        Some(raw) => serde_json::from_str(raw).wrap_err("Stream body must be JSON")?,
        None => Value::Object(Default::default()),
    };

    let stdout = std::io::stdout();
    let mut count = 0usize;
    let stream = gateway.stream(path, RequestOptions::post().json(body), |event| {
        let mut out = stdout.lock();
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
        out.flush()?;
        count += 1;
        Ok(())
    });

    tokio::select! {
        result = stream => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Stream cancelled");
            eprintln!("Cancelled");
        }
    }

    info!(events = count, "Stream finished");
    Ok(())
}

pub fn handle_guard(guard: &RouteGuard, path: &str) -> Result<()> {
    match guard.navigate(path) {
        Verdict::Allow => println!("allow {}", path),
        Verdict::Redirect(target) => println!("redirect {}", target),
    }
    Ok(())
}

/// Reject paths that would escape the API base, such as full URLs.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains("://") {
        return Err(eyre!("expected an API path like /courses, got a URL: {}", path));
    }
    Ok(())
}
