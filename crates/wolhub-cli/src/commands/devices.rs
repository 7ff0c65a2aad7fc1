//! Device command handlers.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use wolhub_core::{Device, DeviceForm, Dispatcher, ListView};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    dispatcher: &Dispatcher,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => list(dispatcher).await,

        DevicesCommand::Add {
            name,
            mac,
            ip,
            broadcast,
            port,
        } => {
            let form = DeviceForm {
                name,
                mac_address: mac,
                ip_address: ip.unwrap_or_default(),
                broadcast_ip: broadcast.unwrap_or_default(),
                port: port.map_or_else(String::new, |p| p.to_string()),
            };
            add(dispatcher, form, global).await
        }

        DevicesCommand::Rm { identifier } => {
            let key = dispatcher.identity().label();
            if !util::confirm(&format!("Delete device with {key} '{identifier}'?"), global.yes)? {
                return Ok(());
            }
            rm(dispatcher, &identifier, global).await
        }
    }
}

// ── List ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MAC ADDRESS")]
    mac: String,
    #[tabled(rename = "IP ADDRESS")]
    ip: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "BROADCAST")]
    broadcast: String,
    #[tabled(rename = "PORT")]
    port: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        // "online" is an IP-presence hint, not a liveness check
        let status = if d.ip_address.is_some() {
            "online"
        } else {
            "offline"
        };
        Self {
            name: d.name.clone(),
            mac: d.mac_address.clone(),
            ip: d.ip_address.clone().unwrap_or_else(|| "-".into()),
            status: status.into(),
            broadcast: d.broadcast_ip.clone().unwrap_or_else(|| "-".into()),
            port: d.port.map_or_else(|| "-".into(), |p| p.to_string()),
        }
    }
}

async fn list(dispatcher: &Dispatcher) -> Result<(), CliError> {
    let mut view = dispatcher.list_view();
    let mut fb = dispatcher.feedback();
    let outcome = dispatcher.refresh().await;

    if !outcome.succeeded() {
        // A failed refresh publishes its wording through the snapshot.
        if let ListView::Failed(message) = &*view.borrow_and_update() {
            return Err(CliError::Operation {
                message: message.clone(),
            });
        }
        return Err(util::failure(outcome, &util::drain_notifications(&mut fb)));
    }

    match &*view.borrow_and_update() {
        ListView::Loaded(devices) if devices.is_empty() => {
            eprintln!("No devices registered yet.");
        }
        ListView::Loaded(devices) => {
            let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{table}");
        }
        // A succeeded refresh always publishes Loaded
        ListView::Loading | ListView::Failed(_) => {}
    }
    Ok(())
}

// ── Add / Rm ────────────────────────────────────────────────────────

async fn add(
    dispatcher: &Dispatcher,
    form: DeviceForm,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !form.is_complete() {
        return Err(CliError::Validation {
            field: "device".into(),
            reason: "name and MAC address are required".into(),
        });
    }

    let mut fb = dispatcher.feedback();
    let outcome = dispatcher.submit_add(form).await;
    let notes = util::drain_notifications(&mut fb);

    if !outcome.succeeded() {
        return Err(util::failure(outcome, &notes));
    }
    if !global.quiet {
        eprintln!("{} Device added", "✓".green());
    }
    Ok(())
}

async fn rm(
    dispatcher: &Dispatcher,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut fb = dispatcher.feedback();
    let outcome = dispatcher.remove(identifier).await;
    let notes = util::drain_notifications(&mut fb);

    if !outcome.succeeded() {
        return Err(util::failure(outcome, &notes));
    }
    if !global.quiet {
        eprintln!("{} Device deleted", "✓".green());
    }
    Ok(())
}
