//! Bus management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ntc_core::error::AppError;
use ntc_core::types::{BusId, RouteId};
use ntc_entity::{Bus, BusDraft};
use ntc_view::manage::BusesView;

use super::AppContext;
use crate::output;

/// Arguments for bus commands
#[derive(Debug, Args)]
pub struct BusArgs {
    /// Bus subcommand
    #[command(subcommand)]
    pub command: BusCommand,
}

/// Bus fields shared by `add` and `update`
#[derive(Debug, Args)]
pub struct BusFields {
    /// Registration / fleet number
    #[arg(long)]
    pub number: String,
    /// Number of seats
    #[arg(long)]
    pub capacity: u32,
    /// Assigned route
    #[arg(long)]
    pub route: Option<RouteId>,
    /// Owner reference
    #[arg(long)]
    pub owner: Option<String>,
    /// Permit number
    #[arg(long)]
    pub permit: Option<String>,
}

impl From<&BusFields> for BusDraft {
    fn from(f: &BusFields) -> Self {
        Self {
            bus_number: f.number.clone(),
            capacity: f.capacity,
            route_id: f.route.clone(),
            bus_owner: f.owner.clone(),
            bus_permission_number: f.permit.clone(),
        }
    }
}

/// Bus subcommands
#[derive(Debug, Subcommand)]
pub enum BusCommand {
    /// List buses (admins see all, operators their own)
    List {
        /// Filter by number, owner, or permit
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a bus
    Add(BusFields),
    /// Update a bus
    Update {
        /// Bus ID
        id: BusId,
        #[command(flatten)]
        fields: BusFields,
    },
    /// Delete a bus
    Delete {
        /// Bus ID
        id: BusId,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Bus display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct BusRow {
    /// Bus ID
    id: String,
    /// Number
    number: String,
    /// Capacity
    capacity: u32,
    /// Route
    route: String,
    /// Owner
    owner: String,
    /// Permit
    permit: String,
}

impl From<&Bus> for BusRow {
    fn from(b: &Bus) -> Self {
        Self {
            id: b.id.to_string(),
            number: b.bus_number.clone(),
            capacity: b.capacity,
            route: b.route_label(),
            owner: b.owner_name().unwrap_or("-").to_string(),
            permit: b.bus_permission_number.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

/// Execute bus commands
pub async fn execute(args: &BusArgs, app: &AppContext) -> Result<(), AppError> {
    let view = BusesView::new(app.api.clone(), app.view.clone());

    match &args.command {
        BusCommand::List { search } => {
            view.load().await?;
            let buses = view.filtered(search.as_deref().unwrap_or_default());
            let rows: Vec<BusRow> = buses.iter().map(BusRow::from).collect();
            output::print_list(&rows, app.format);
        }
        BusCommand::Add(fields) => view.create(&BusDraft::from(fields)).await?,
        BusCommand::Update { id, fields } => view.update(id, &BusDraft::from(fields)).await?,
        BusCommand::Delete { id, force } => {
            if output::confirm(&format!("Delete bus {id}?"), *force)? {
                view.delete(id).await?;
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}
