use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ParseSalesStageError;

/// Position of a lead in the sales funnel.
///
/// Each stage serializes to the id the CRM stores (`novo`, `liquidacao`, ...)
/// and also accepts its English name on input.
///
/// Funnel progression:
/// - `New` -> `Connected` -> `Qualification` -> `Proposal`
/// - `Proposal` | `Documentation` | `Awaiting` ... -> `Settlement`
/// - `Settlement` -> `SettlementApproved`
/// - any working stage -> `Recycle` -> `New` | `Connected`
/// - `Unknown` connects to every stage in both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesStage {
    /// Lead just entered the funnel.
    #[serde(rename = "novo", alias = "new")]
    New,

    /// First contact established.
    #[serde(rename = "conectado", alias = "connected")]
    Connected,

    #[serde(rename = "qualificacao", alias = "qualification")]
    Qualification,

    /// Offer sent to the client.
    #[serde(rename = "proposta", alias = "proposal")]
    Proposal,

    /// Collecting the client's documents.
    #[serde(rename = "documentacao", alias = "documentation")]
    Documentation,

    /// Documents submitted for registration with the paying agency.
    #[serde(
        rename = "documentos_averbacao",
        alias = "documentation-registration"
    )]
    DocumentationRegistration,

    /// Waiting on a third party (bank, agency).
    #[serde(rename = "aguardando", alias = "awaiting")]
    Awaiting,

    /// Waiting on the client.
    #[serde(rename = "aguardando_cliente", alias = "awaiting-client")]
    AwaitingClient,

    #[serde(rename = "liquidacao", alias = "settlement")]
    Settlement,

    /// Settlement confirmed. Can still be recycled.
    #[serde(rename = "aprovado_liquidacao", alias = "settlement-approved")]
    SettlementApproved,

    /// Sent back for early-funnel reprocessing.
    #[serde(rename = "reciclar", alias = "recycle")]
    Recycle,

    /// Unmapped or legacy value. Reachable from, and leads to, every stage.
    #[serde(rename = "desconhecido", alias = "unknown")]
    Unknown,
}

impl SalesStage {
    /// All stages in funnel order.
    pub const ALL: [SalesStage; 12] = [
        SalesStage::New,
        SalesStage::Connected,
        SalesStage::Qualification,
        SalesStage::Proposal,
        SalesStage::Documentation,
        SalesStage::DocumentationRegistration,
        SalesStage::Awaiting,
        SalesStage::AwaitingClient,
        SalesStage::Settlement,
        SalesStage::SettlementApproved,
        SalesStage::Recycle,
        SalesStage::Unknown,
    ];

    /// The persisted identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesStage::New => "novo",
            SalesStage::Connected => "conectado",
            SalesStage::Qualification => "qualificacao",
            SalesStage::Proposal => "proposta",
            SalesStage::Documentation => "documentacao",
            SalesStage::DocumentationRegistration => "documentos_averbacao",
            SalesStage::Awaiting => "aguardando",
            SalesStage::AwaitingClient => "aguardando_cliente",
            SalesStage::Settlement => "liquidacao",
            SalesStage::SettlementApproved => "aprovado_liquidacao",
            SalesStage::Recycle => "reciclar",
            SalesStage::Unknown => "desconhecido",
        }
    }

    /// English kebab-case name, accepted as input alongside the persisted id.
    pub fn alias(&self) -> &'static str {
        match self {
            SalesStage::New => "new",
            SalesStage::Connected => "connected",
            SalesStage::Qualification => "qualification",
            SalesStage::Proposal => "proposal",
            SalesStage::Documentation => "documentation",
            SalesStage::DocumentationRegistration => "documentation-registration",
            SalesStage::Awaiting => "awaiting",
            SalesStage::AwaitingClient => "awaiting-client",
            SalesStage::Settlement => "settlement",
            SalesStage::SettlementApproved => "settlement-approved",
            SalesStage::Recycle => "recycle",
            SalesStage::Unknown => "unknown",
        }
    }

    /// Human-readable label for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            SalesStage::New => "New",
            SalesStage::Connected => "Connected",
            SalesStage::Qualification => "Qualification",
            SalesStage::Proposal => "Proposal",
            SalesStage::Documentation => "Documentation",
            SalesStage::DocumentationRegistration => "Documentation Registration",
            SalesStage::Awaiting => "Awaiting",
            SalesStage::AwaitingClient => "Awaiting Client",
            SalesStage::Settlement => "Settlement",
            SalesStage::SettlementApproved => "Settlement Approved",
            SalesStage::Recycle => "Recycle",
            SalesStage::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SalesStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesStage {
    type Err = ParseSalesStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        SalesStage::ALL
            .into_iter()
            .find(|stage| {
                stage.alias() == normalized || stage.as_str().replace('_', "-") == normalized
            })
            .ok_or_else(|| ParseSalesStageError(s.to_string()))
    }
}
