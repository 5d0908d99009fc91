use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use clinic_client::config::ClientConfig;
use clinic_client::models::{Message, MessageRole, SlotDescriptor};
use clinic_client::services::actions::{self, Affordance};
use clinic_client::services::api::ClinicApi;
use clinic_client::services::conversation::{ChatSession, TurnOutcome};
use clinic_client::services::credentials::{AuthContext, SqliteCredentialStore};
use clinic_client::services::transport::HttpTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env();

    let store = SqliteCredentialStore::open(&config.credential_db)
        .context("failed to open credential store")?;
    let auth = AuthContext::new(Arc::new(store));
    let transport = HttpTransport::new(
        &config.api_base_url,
        auth.clone(),
        config.request_timeout_secs.map(Duration::from_secs),
    )?;
    let api = ClinicApi::new(transport);

    if let Some((email, password)) = config.login_credentials() {
        if let Err(e) = api.auth.login(email, password).await {
            tracing::warn!(error = %e, "startup login failed");
        }
    }

    let session = ChatSession::new(Arc::new(api.agent.clone()), config.chat_role);
    tracing::info!(
        session_id = session.session_id(),
        backend = %config.api_base_url,
        authenticated = auth.is_authenticated(),
        "chat session started"
    );
    println!("Clinic assistant ready. Commands: /login <email> <password>, /logout, /me, /slots [date], /book <n>, /quit");

    let mut offered: Vec<SlotDescriptor> = Vec::new();
    let mut offered_date: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("/quit") => break,
            Some("/login") => match (parts.next(), parts.next()) {
                (Some(email), Some(password)) => match api.auth.login(email, password).await {
                    Ok(resp) => println!("Logged in as {:?}.", resp.role),
                    Err(e) => println!("Login failed: {e}"),
                },
                _ => println!("Usage: /login <email> <password>"),
            },
            Some("/logout") => {
                api.auth.logout().await?;
                println!("Logged out.");
            }
            Some("/me") => match api.auth.get_me().await {
                Ok(me) => println!("{} <{}> ({:?})", me.full_name, me.email, me.role),
                Err(e) => report(&e),
            },
            Some("/slots") => {
                let date = parts.next().map(str::to_string);
                match api.agent.view_slots(date.as_deref(), None).await {
                    Ok(reply) => {
                        let message = Message::from_reply(&reply);
                        offered = reply.slots.unwrap_or_default();
                        offered_date = date;
                        render(&message, &offered);
                    }
                    Err(e) => report(&e),
                }
            }
            Some("/book") => {
                let Some(slot) = parts
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| offered.get(i))
                else {
                    println!("Pick a slot number from the last list.");
                    continue;
                };
                let patient_id = match api.auth.get_me().await {
                    Ok(me) => me.id,
                    Err(e) => {
                        report(&e);
                        continue;
                    }
                };
                match api
                    .agent
                    .book_slot(&slot.slot_id, &patient_id, offered_date.as_deref())
                    .await {
                    Ok(reply) => render(&Message::from_reply(&reply), &[]),
                    Err(e) => report(&e),
                }
            }
            Some(_) => {
                let outcome = session.send(line).await;
                if let Some(message) = outcome.message() {
                    if let Some(Affordance::OpenBookingFlow { slots, .. }) =
                        actions::resolve_message(message)
                    {
                        offered = slots;
                        offered_date = None;
                    }
                    render(message, &offered);
                }
                if let TurnOutcome::Fallback { error, .. } = &outcome {
                    if error.is_auth_expired() {
                        println!("(Your session expired. Use /login to sign in again.)");
                    }
                }
            }
            None => {}
        }
    }

    Ok(())
}

fn render(message: &Message, slots: &[SlotDescriptor]) {
    let speaker = match message.role {
        MessageRole::User => "you",
        MessageRole::Agent => "assistant",
    };
    println!("{speaker}: {}", message.content);

    match actions::resolve_message(message) {
        Some(Affordance::OpenBookingFlow { label, .. }) => {
            println!("  [{label}]");
            for (i, slot) in slots.iter().enumerate() {
                println!("  {}. {}", i + 1, slot.display_time());
            }
        }
        Some(Affordance::Navigate { label, href }) => println!("  [{label}] -> {href}"),
        None => {}
    }
}

fn report(error: &clinic_client::errors::ApiError) {
    if error.is_auth_expired() {
        println!("Not signed in or session expired. Use /login.");
    } else {
        println!("Request failed: {error}");
    }
}
