// Domain records: reference items returned by list endpoints, the two
// form drafts and the JSON payloads they turn into.

use crate::error::DeskError;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column names used by the helpdesk API.
pub mod columns {
    pub const KEY: &str = "Chave";
    pub const SEQUENCE: &str = "Sequencia";
    pub const NAME: &str = "Nome";
    pub const SURNAME: &str = "Sobrenome";
    pub const EMAIL: &str = "Email";
    pub const SUBJECT: &str = "Assunto";
    pub const SUBCATEGORY: &str = "SubCategoria";
    pub const CLIENT: &str = "Cliente";
    pub const CLIENT_CODE: &str = "CodigoCliente";
    pub const GROUP_NAME: &str = "NomeGrupo";
    pub const PORTAL: &str = "Portal";
    pub const ON_OFF: &str = "OnOff";
    pub const MAIN_GROUP: &str = "GrupoPrincipal";
    pub const GROUP_EMAIL: &str = "EmailGrupo";
    pub const GROUP_CODE: &str = "CodGrupo";
}

/// Placeholder shown for a column the record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// One record of any "lista" endpoint.
///
/// The columns the forms depend on are typed; anything else the API
/// returns lands in `extra`. Values may arrive as strings or numbers and
/// are normalised to strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReferenceItem {
    #[serde(rename = "Chave", default, deserialize_with = "text_or_number")]
    pub key: Option<String>,
    #[serde(rename = "Sequencia", default, deserialize_with = "text_or_number")]
    pub sequence: Option<String>,
    #[serde(rename = "Nome", default, deserialize_with = "text_or_number")]
    pub name: Option<String>,
    #[serde(rename = "Sobrenome", default, deserialize_with = "text_or_number")]
    pub surname: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "text_or_number")]
    pub email: Option<String>,
    #[serde(rename = "Assunto", default, deserialize_with = "text_or_number")]
    pub subject: Option<String>,
    #[serde(rename = "SubCategoria", default, deserialize_with = "text_or_number")]
    pub subcategory: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_text(&v)))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ReferenceItem {
    /// Value of a column by its API name.
    pub fn get(&self, column: &str) -> Option<String> {
        let typed = match column {
            columns::KEY => &self.key,
            columns::SEQUENCE => &self.sequence,
            columns::NAME => &self.name,
            columns::SURNAME => &self.surname,
            columns::EMAIL => &self.email,
            columns::SUBJECT => &self.subject,
            columns::SUBCATEGORY => &self.subcategory,
            _ => return self.extra.get(column).and_then(value_text),
        };
        typed.clone()
    }

    /// Like [`get`](Self::get) but falls back to `N/A` for display.
    pub fn display(&self, column: &str) -> String {
        self.get(column).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// A chosen reference item reduced to what a payload needs: its code and
/// a human label for the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub code: String,
    pub label: String,
}

impl Pick {
    pub fn from_item(
        item: &ReferenceItem,
        code_column: &'static str,
        label_column: &str,
    ) -> Result<Self, DeskError> {
        let code = item
            .get(code_column)
            .ok_or(DeskError::MissingField { column: code_column })?;
        Ok(Pick {
            code,
            label: item.display(label_column),
        })
    }
}

/// The requester of a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub key: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
}

impl Requester {
    pub fn from_item(item: &ReferenceItem) -> Result<Self, DeskError> {
        Ok(Requester {
            key: item.key.clone().ok_or(DeskError::MissingField { column: columns::KEY })?,
            name: item.display(columns::NAME),
            surname: item.surname.clone().unwrap_or_default(),
            email: item.email.clone(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim_end().to_string()
    }
}

/// Three-step scale shared by impact and urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    /// Menu answer to level; anything but "1" or "2" is `Low`.
    pub fn from_choice(input: &str) -> Self {
        match input.trim() {
            "1" => Level::High,
            "2" => Level::Medium,
            _ => Level::Low,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Level::High => "000001",
            Level::Medium => "000002",
            Level::Low => "000003",
        }
    }

    pub fn impact_label(self) -> &'static str {
        match self {
            Level::High => "Alto",
            Level::Medium => "Médio",
            Level::Low => "Baixo",
        }
    }

    pub fn urgency_label(self) -> &'static str {
        match self {
            Level::High => "Alta",
            Level::Medium => "Média",
            Level::Low => "Baixa",
        }
    }
}

/// How a ticket is classified: either a preset auto-category, or a free
/// subject paired with a subcategory. Never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Auto(Pick),
    Manual { subject: String, subcategory: Pick },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub requester: Requester,
    pub classification: Classification,
    pub description: String,
    pub request_type: Pick,
    pub occurrence_type: Pick,
    pub impact: Level,
    pub urgency: Level,
    pub transfer_group: Option<Pick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicketPayload {
    #[serde(rename = "TChamado")]
    pub ticket: NewTicket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewTicket {
    pub solicitante: String,
    pub email: String,
    pub descricao: String,
    pub solicitacao: String,
    pub tipo_ocorrencia: String,
    pub impacto: String,
    pub urgencia: String,
    pub envia_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assunto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transf_cod_grupo: Option<String>,
}

impl TicketDraft {
    pub fn payload(&self) -> NewTicketPayload {
        let (auto_categoria, assunto, categoria) = match &self.classification {
            Classification::Auto(auto) => (Some(auto.code.clone()), None, None),
            Classification::Manual { subject, subcategory } => {
                (None, Some(subject.clone()), Some(subcategory.code.clone()))
            }
        };

        NewTicketPayload {
            ticket: NewTicket {
                solicitante: self.requester.key.clone(),
                email: self.requester.email.clone().unwrap_or_default(),
                descricao: self.description.clone(),
                solicitacao: self.request_type.code.clone(),
                tipo_ocorrencia: self.occurrence_type.code.clone(),
                impacto: self.impact.code().into(),
                urgencia: self.urgency.code().into(),
                envia_email: "S".into(),
                auto_categoria,
                assunto,
                categoria,
                transf_cod_grupo: self.transfer_group.as_ref().map(|g| g.code.clone()),
            },
        }
    }

    /// Label/value pairs for the confirmation screen.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Solicitante", self.requester.full_name()),
            (
                "Email",
                self.requester
                    .email
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.into()),
            ),
        ];
        match &self.classification {
            Classification::Auto(auto) => rows.push(("Auto-Categoria", auto.label.clone())),
            Classification::Manual { subject, .. } => rows.push(("Assunto", subject.clone())),
        }
        rows.push(("Tipo de Solicitação", self.request_type.label.clone()));
        rows.push(("Tipo de Ocorrência", self.occurrence_type.label.clone()));
        rows.push(("Descrição", abbreviate(&self.description)));
        if let Classification::Manual { subcategory, .. } = &self.classification {
            rows.push(("Subcategoria", subcategory.label.clone()));
        }
        rows.push(("Impacto", self.impact.impact_label().into()));
        rows.push(("Urgência", self.urgency.urgency_label().into()));
        if let Some(group) = &self.transfer_group {
            rows.push(("Grupo", group.label.clone()));
        }
        rows
    }
}

/// Time span recorded for an interaction: two minutes ending at the
/// current minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl InteractionWindow {
    pub const LENGTH_MINUTES: i64 = 2;

    pub fn ending_at(now: NaiveDateTime) -> Self {
        // Truncate to the minute so both ends format identically.
        let end = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        let start = end - Duration::minutes(Self::LENGTH_MINUTES);
        InteractionWindow { start, end }
    }

    pub fn date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn date_text(&self) -> String {
        self.end.format("%d-%m-%Y").to_string()
    }

    pub fn start_text(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionDraft {
    pub ticket_key: String,
    pub attendance_type: Pick,
    pub status: Pick,
    pub description: String,
    pub operator: Option<Pick>,
    pub group: Option<Pick>,
    pub window: InteractionWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionPayload {
    #[serde(rename = "Chave")]
    pub ticket_key: String,
    #[serde(rename = "TChamado")]
    pub interaction: Interaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Interaction {
    pub cod_forma_atendimento: String,
    pub cod_status: String,
    pub descricao: String,
    pub enviar_email: String,
    pub env_base: String,
    pub data_interacao: String,
    pub hora_inicial: String,
    pub hora_final: String,
    pub primeiro_atendimento: String,
    pub segundo_atendimento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_operador: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_grupo: Option<String>,
}

impl InteractionDraft {
    pub fn payload(&self) -> InteractionPayload {
        InteractionPayload {
            ticket_key: self.ticket_key.clone(),
            interaction: Interaction {
                cod_forma_atendimento: self.attendance_type.code.clone(),
                cod_status: self.status.code.clone(),
                descricao: self.description.clone(),
                enviar_email: "N".into(),
                env_base: "N".into(),
                data_interacao: self.window.date_text(),
                hora_inicial: self.window.start_text(),
                hora_final: self.window.end_text(),
                primeiro_atendimento: "N".into(),
                segundo_atendimento: "N".into(),
                cod_operador: self.operator.as_ref().map(|o| o.code.clone()),
                cod_grupo: self.group.as_ref().map(|g| g.code.clone()),
            },
        }
    }

    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Chamado", self.ticket_key.clone()),
            ("Forma de Atendimento", self.attendance_type.label.clone()),
            ("Status", self.status.label.clone()),
            ("Descrição", abbreviate(&self.description)),
        ];
        if let Some(operator) = &self.operator {
            rows.push(("Operador", operator.label.clone()));
        }
        if let Some(group) = &self.group {
            rows.push(("Grupo", group.label.clone()));
        }
        rows.push((
            "Data/Hora",
            format!(
                "{} {} - {}",
                self.window.date_text(),
                self.window.start_text(),
                self.window.end_text()
            ),
        ));
        rows
    }
}

const SUMMARY_DESCRIPTION_CHARS: usize = 50;

fn abbreviate(text: &str) -> String {
    if text.chars().count() > SUMMARY_DESCRIPTION_CHARS {
        let head: String = text.chars().take(SUMMARY_DESCRIPTION_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
