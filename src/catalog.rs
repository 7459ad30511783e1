// Reference-data catalogs exposed by the helpdesk API. Every catalog is
// a `POST <Entity>/lista` call; they differ only in the query they send
// and the columns worth showing.

use crate::model::columns::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Requesters,
    AutoCategories,
    Categories,
    Subcategories,
    RequestTypes,
    OccurrenceTypes,
    Groups,
    AttendanceTypes,
    Statuses,
    Causes,
    Operators,
}

/// Body of a list call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    #[serde(rename = "Pesquisa")]
    pub search: String,
    #[serde(rename = "Ativo")]
    pub active: &'static str,
    #[serde(rename = "Colunas", skip_serializing_if = "Option::is_none")]
    pub columns: Option<BTreeMap<&'static str, &'static str>>,
    #[serde(rename = "Ordem")]
    pub order: Vec<SortSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSpec {
    #[serde(rename = "Coluna")]
    pub column: &'static str,
    #[serde(rename = "Direcao")]
    pub ascending: &'static str,
}

impl Catalog {
    /// Order used by the main menu (entries 3 through 13).
    pub const ALL: [Catalog; 11] = [
        Catalog::Requesters,
        Catalog::AutoCategories,
        Catalog::Categories,
        Catalog::Subcategories,
        Catalog::RequestTypes,
        Catalog::OccurrenceTypes,
        Catalog::Groups,
        Catalog::AttendanceTypes,
        Catalog::Statuses,
        Catalog::Causes,
        Catalog::Operators,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            Catalog::Requesters => "Usuarios/lista",
            Catalog::AutoCategories => "AutoCategorias/lista",
            Catalog::Categories => "Categorias/lista",
            Catalog::Subcategories => "SubCategorias/lista",
            Catalog::RequestTypes => "Solicitacoes/lista",
            Catalog::OccurrenceTypes => "TipoOcorrencias/lista",
            Catalog::Groups => "Grupos/lista",
            Catalog::AttendanceTypes => "FormaAtendimento/lista",
            Catalog::Statuses => "Status/lista",
            Catalog::Causes => "Causas/lista",
            Catalog::Operators => "GerenteOperador/lista",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Catalog::Requesters => "Solicitantes",
            Catalog::AutoCategories => "Auto-Categorias",
            Catalog::Categories => "Categorias",
            Catalog::Subcategories => "Subcategorias",
            Catalog::RequestTypes => "Tipos de Solicitação",
            Catalog::OccurrenceTypes => "Tipos de Ocorrência",
            Catalog::Groups => "Grupos",
            Catalog::AttendanceTypes => "Formas de Atendimento",
            Catalog::Statuses => "Status",
            Catalog::Causes => "Causas",
            Catalog::Operators => "Operadores",
        }
    }

    /// Menu caption.
    pub fn menu_label(self) -> String {
        format!("Listar {}", self.title().to_lowercase())
    }

    // The newer endpoints filter on "1", the older ones on "S".
    fn active_flag(self) -> &'static str {
        match self {
            Catalog::Groups
            | Catalog::AttendanceTypes
            | Catalog::Statuses
            | Catalog::Causes => "1",
            _ => "S",
        }
    }

    // Empty means "let the API pick the columns".
    fn projection(self) -> &'static [&'static str] {
        match self {
            Catalog::Requesters => &[KEY, CLIENT_CODE, CLIENT, EMAIL, NAME, SURNAME],
            Catalog::AutoCategories => &[KEY, SUBJECT, GROUP_NAME, PORTAL],
            Catalog::Operators => &[
                KEY, NAME, SURNAME, EMAIL, ON_OFF, MAIN_GROUP, GROUP_EMAIL, GROUP_CODE,
            ],
            _ => &[],
        }
    }

    fn sort_column(self) -> &'static str {
        match self {
            Catalog::AutoCategories => SUBJECT,
            Catalog::Subcategories => SUBCATEGORY,
            _ => NAME,
        }
    }

    /// Columns shown, in order, for every record of a listing.
    pub fn listed_columns(self) -> &'static [&'static str] {
        match self {
            Catalog::Requesters => &[KEY, NAME, SURNAME, EMAIL, CLIENT],
            Catalog::AutoCategories => &[KEY, SUBJECT, GROUP_NAME, PORTAL],
            Catalog::Categories
            | Catalog::RequestTypes
            | Catalog::Groups
            | Catalog::AttendanceTypes => &[KEY, NAME],
            Catalog::Subcategories => &[KEY, SUBCATEGORY],
            Catalog::OccurrenceTypes | Catalog::Statuses | Catalog::Causes => &[SEQUENCE, NAME],
            Catalog::Operators => &[KEY, NAME, SURNAME, EMAIL, MAIN_GROUP],
        }
    }

    /// Column that identifies a record when it is picked in a form.
    pub fn code_column(self) -> &'static str {
        match self {
            Catalog::OccurrenceTypes | Catalog::Statuses | Catalog::Causes => SEQUENCE,
            _ => KEY,
        }
    }

    /// Column used as the label when picking a record.
    pub fn label_column(self) -> &'static str {
        match self {
            Catalog::AutoCategories => SUBJECT,
            Catalog::Subcategories => SUBCATEGORY,
            _ => NAME,
        }
    }

    pub fn query(self, search: &str) -> ListQuery {
        let projection = self.projection();
        ListQuery {
            search: search.to_string(),
            active: self.active_flag(),
            columns: (!projection.is_empty())
                .then(|| projection.iter().map(|c| (*c, "on")).collect()),
            order: vec![SortSpec {
                column: self.sort_column(),
                ascending: "true",
            }],
        }
    }
}
