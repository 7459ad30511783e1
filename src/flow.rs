// Interactive flows: main menu, catalog listings, the record selector and
// the two forms (open ticket, add interaction).
//
// Forms are straight-line: each step either yields a value or aborts the
// whole form back to the menu. API failures are shown to the operator and
// turned into empty results here; they never end the loop.

use crate::api::ApiClient;
use crate::catalog::Catalog;
use crate::config::{self, Config};
use crate::error::{ConfigError, DeskError};
use crate::model::{
    Classification, InteractionDraft, InteractionWindow, Level, Pick, ReferenceItem, Requester,
    TicketDraft,
};
use crate::terminal::Terminal;
use crate::transport::Transport;
use crate::ui::Tone;
use chrono::{Local, NaiveDateTime};
use std::io;
use thiserror::Error;
use tracing::debug;

/// The only answer that confirms a submission.
pub const AFFIRMATIVE: &str = "S";

const APP_TITLE: &str = "Desk Manager API";
const APP_SUBTITLE: &str = "Sistema de Gerenciamento de Chamados";
const CHOOSE: &str = "Escolha uma opção";

/// Why a form stopped before submission.
#[derive(Debug, Error)]
enum FormError {
    #[error("{0}")]
    Required(&'static str),

    #[error(transparent)]
    Record(#[from] DeskError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn required<T>(value: Option<T>, message: &'static str) -> Result<T, FormError> {
    value.ok_or(FormError::Required(message))
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Show the fatal "credentials missing" notice.
pub fn report_config_error(term: &mut dyn Terminal, err: &ConfigError) -> io::Result<()> {
    let ConfigError::Missing(names) = err;
    let user_file = config::user_env_file()
        .map(|p| format!(" (ou {})", p.display()))
        .unwrap_or_default();
    let message = format!(
        "Credenciais não configuradas!\n\
         Faltando: {}\n\n\
         Para configurar:\n\
         1. Edite o arquivo .env{user_file} e preencha {} e {}\n\
         2. Execute o programa novamente",
        names.join(", "),
        config::OPERATOR_KEY_VAR,
        config::ENVIRONMENT_KEY_VAR,
    );
    let screen = term.screen();
    term.clear()?;
    screen.notice(term.writer(), Tone::Error, &message)
}

/// Authenticate with the configured keys, reporting the outcome.
/// Returns whether a session was established.
pub fn login<T: Transport>(
    api: &mut ApiClient<T>,
    config: &Config,
    term: &mut dyn Terminal,
) -> io::Result<bool> {
    let screen = term.screen();
    term.clear()?;
    screen.banner(term.writer(), APP_TITLE, APP_SUBTITLE)?;
    screen.notice(term.writer(), Tone::Info, "Autenticando na API...")?;

    let spinner = term.busy("Autenticando...");
    let outcome = api.authenticate(&config.operator_key, &config.environment_key);
    spinner.finish_and_clear();

    match outcome {
        Ok(()) => {
            screen.notice(term.writer(), Tone::Success, "Autenticação realizada com sucesso!")?;
            Ok(true)
        }
        Err(e) => {
            let mut message = format!("Erro ao autenticar: {e}");
            if let Some(detail) = e.detail() {
                message.push_str(&format!("\n{detail}"));
            }
            screen.notice(term.writer(), Tone::Error, &message)?;
            screen.notice(
                term.writer(),
                Tone::Error,
                "Falha na autenticação. Verifique suas credenciais.",
            )?;
            Ok(false)
        }
    }
}

/// Flow controller over an authenticated client.
pub struct Desk<'a, T: Transport> {
    api: &'a ApiClient<T>,
    term: &'a mut dyn Terminal,
    clock: fn() -> NaiveDateTime,
}

impl<'a, T: Transport> Desk<'a, T> {
    pub fn new(api: &'a ApiClient<T>, term: &'a mut dyn Terminal) -> Self {
        Desk {
            api,
            term,
            clock: local_now,
        }
    }

    /// Replace the wall clock used to stamp interactions.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Main menu loop. Returns when the operator picks 0 or interrupts.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.term.clear()?;
            self.banner(APP_TITLE, APP_SUBTITLE)?;
            self.show_menu()?;

            let Some(input) = self.ask(CHOOSE)? else {
                self.notice(Tone::Info, "Encerrando o sistema...")?;
                return Ok(());
            };
            let Ok(choice) = input.trim().parse::<usize>() else {
                self.notice(Tone::Warning, "Opção inválida!")?;
                self.pause()?;
                continue;
            };

            match choice {
                0 => {
                    self.notice(Tone::Info, "Encerrando o sistema...")?;
                    return Ok(());
                }
                1 => self.open_ticket()?,
                2 => self.add_interaction()?,
                n if (3..3 + Catalog::ALL.len()).contains(&n) => {
                    self.show_catalog(Catalog::ALL[n - 3])?
                }
                _ => {
                    self.notice(Tone::Warning, "Opção inválida!")?;
                    self.pause()?;
                }
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        let screen = self.term.screen();
        let out = self.term.writer();
        writeln!(out)?;
        screen.item(out, None, "OPERAÇÕES", None)?;
        screen.item(out, Some("1"), "Abrir novo chamado", None)?;
        screen.item(out, Some("2"), "Interagir com chamado existente", None)?;
        writeln!(out)?;
        screen.item(out, None, "CONSULTAS", None)?;
        for (offset, catalog) in Catalog::ALL.iter().enumerate() {
            let index = (offset + 3).to_string();
            screen.item(out, Some(&index), &catalog.menu_label(), None)?;
        }
        writeln!(out)?;
        screen.item(out, Some("0"), "Sair", None)?;
        writeln!(out)
    }

    /// Fetch and print one catalog.
    pub fn show_catalog(&mut self, catalog: Catalog) -> io::Result<()> {
        self.term.clear()?;
        self.banner("CONSULTA", catalog.title())?;

        let search = if catalog == Catalog::Requesters {
            self.ask("Pesquisar (ENTER para todos)")?.unwrap_or_default()
        } else {
            String::new()
        };
        let items = self.fetch(catalog, search.trim())?;
        self.render_list(catalog, &items)?;
        self.pause()
    }

    /// Numbered records, each with the catalog's columns in fixed order.
    pub fn render_list(&mut self, catalog: Catalog, items: &[ReferenceItem]) -> io::Result<()> {
        if items.is_empty() {
            let message = format!("Nenhum(a) {} encontrado(a).", catalog.title().to_lowercase());
            return self.notice(Tone::Warning, &message);
        }
        self.banner(catalog.title(), &format!("Total: {} registro(s)", items.len()))?;

        let screen = self.term.screen();
        let out = self.term.writer();
        for (i, item) in items.iter().enumerate() {
            screen.record(out, i + 1)?;
            for column in catalog.listed_columns() {
                screen.item(out, None, column, Some(&item.display(column)))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// List a catalog; a failed call is reported and reads as empty.
    fn fetch(&mut self, catalog: Catalog, search: &str) -> io::Result<Vec<ReferenceItem>> {
        let spinner = self.term.busy("Consultando...");
        let result = self.api.list(catalog, search);
        spinner.finish_and_clear();

        match result {
            Ok(items) => Ok(items),
            Err(e) => {
                debug!(endpoint = catalog.endpoint(), "list failed: {e}");
                self.report_failure(&format!("Erro na requisição para {}: {e}", catalog.endpoint()), &e)?;
                Ok(Vec::new())
            }
        }
    }

    /// Numbered picker over `items`, labelled by `label_column` with the
    /// `code_column` value alongside. `0` skips; an interrupt also skips.
    pub fn choose(
        &mut self,
        items: &[ReferenceItem],
        heading: &str,
        noun: &str,
        label_column: &str,
        code_column: &str,
    ) -> io::Result<Option<ReferenceItem>> {
        if items.is_empty() {
            let message = format!("Nenhum(a) {} disponível.", noun.to_lowercase());
            self.notice(Tone::Warning, &message)?;
            return Ok(None);
        }

        {
            let screen = self.term.screen();
            let out = self.term.writer();
            writeln!(out)?;
            screen.item(out, None, &heading.to_uppercase(), None)?;
            writeln!(out)?;
            for (i, item) in items.iter().enumerate() {
                let code = format!("Código: {}", item.display(code_column));
                screen.item(out, Some(&(i + 1).to_string()), &item.display(label_column), Some(&code))?;
            }
            screen.item(out, Some("0"), "Pular esta seleção", None)?;
            writeln!(out)?;
        }

        loop {
            let Some(input) = self.ask(CHOOSE)? else {
                return Ok(None);
            };
            match input.trim().parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(n) if n <= items.len() => return Ok(Some(items[n - 1].clone())),
                Ok(_) => self.notice(Tone::Warning, "Opção inválida!")?,
                Err(_) => self.notice(Tone::Warning, "Digite um número válido!")?,
            }
        }
    }

    fn select(&mut self, catalog: Catalog, heading: &str) -> io::Result<Option<ReferenceItem>> {
        let items = self.fetch(catalog, "")?;
        self.choose(
            &items,
            heading,
            catalog.title(),
            catalog.label_column(),
            catalog.code_column(),
        )
    }

    fn pick(&mut self, catalog: Catalog, heading: &str) -> Result<Option<Pick>, FormError> {
        let Some(item) = self.select(catalog, heading)? else {
            return Ok(None);
        };
        Ok(Some(Pick::from_item(
            &item,
            catalog.code_column(),
            catalog.label_column(),
        )?))
    }

    /// Free-text answer, trimmed; blank answers read as `None`.
    fn text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        writeln!(self.term.writer())?;
        Ok(self
            .ask(prompt)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    /// Open-ticket form followed by confirmation and submission.
    pub fn open_ticket(&mut self) -> io::Result<()> {
        self.term.clear()?;
        self.banner("ABERTURA DE CHAMADO", "Preencha os dados do chamado")?;

        match self.collect_ticket() {
            Ok(draft) => self.submit_ticket(&draft)?,
            Err(FormError::Io(e)) => return Err(e),
            Err(e) => self.notice(Tone::Error, &e.to_string())?,
        }
        self.pause()
    }

    fn collect_ticket(&mut self) -> Result<TicketDraft, FormError> {
        let requester = self.select(Catalog::Requesters, "Selecione o Solicitante")?;
        let requester = Requester::from_item(&required(requester, "Solicitante é obrigatório!")?)?;

        let auto_category = self.pick(
            Catalog::AutoCategories,
            "Selecione a Auto-Categoria (opcional)",
        )?;

        let subject = match auto_category {
            Some(_) => None,
            None => Some(required(
                self.text("Digite o Assunto do chamado")?,
                "Assunto é obrigatório quando não há auto-categoria!",
            )?),
        };

        let description = required(
            self.text("Digite a Descrição do chamado")?,
            "Descrição é obrigatória!",
        )?;

        let request_type = required(
            self.pick(Catalog::RequestTypes, "Selecione o Tipo de Solicitação")?,
            "Tipo de Solicitação é obrigatório!",
        )?;

        let occurrence_type = required(
            self.pick(Catalog::OccurrenceTypes, "Selecione o Tipo de Ocorrência")?,
            "Tipo de Ocorrência é obrigatório!",
        )?;

        let classification = match (auto_category, subject) {
            (Some(auto), _) => Classification::Auto(auto),
            (None, subject) => {
                let subcategory = required(
                    self.pick(Catalog::Subcategories, "Selecione a Subcategoria")?,
                    "Subcategoria é obrigatória quando não há auto-categoria!",
                )?;
                Classification::Manual {
                    subject: subject.unwrap_or_default(),
                    subcategory,
                }
            }
        };

        let (impact, urgency) = self.ask_levels()?;

        let transfer_group = self.pick(Catalog::Groups, "Selecione o Grupo para Transferir (opcional)")?;

        Ok(TicketDraft {
            requester,
            classification,
            description,
            request_type,
            occurrence_type,
            impact,
            urgency,
            transfer_group,
        })
    }

    fn ask_levels(&mut self) -> io::Result<(Level, Level)> {
        {
            let screen = self.term.screen();
            let out = self.term.writer();
            writeln!(out)?;
            screen.item(out, None, "IMPACTO E URGÊNCIA", None)?;
            writeln!(out)?;
            for (index, level) in [("1", Level::High), ("2", Level::Medium), ("3", Level::Low)] {
                screen.item(out, Some(index), level.impact_label(), None)?;
            }
            writeln!(out)?;
        }
        let impact = Level::from_choice(&self.ask("Selecione o Impacto")?.unwrap_or_default());
        let urgency = Level::from_choice(&self.ask("Selecione a Urgência")?.unwrap_or_default());
        Ok((impact, urgency))
    }

    fn submit_ticket(&mut self, draft: &TicketDraft) -> io::Result<()> {
        self.summary("RESUMO DO CHAMADO", &draft.summary())?;
        if !self.confirm("Confirmar abertura do chamado? (S/N)")? {
            return self.notice(Tone::Warning, "Abertura cancelada.");
        }

        self.notice(Tone::Info, "Abrindo chamado...")?;
        let payload = draft.payload();
        debug!(?payload, "opening ticket");

        let spinner = self.term.busy("Enviando...");
        let result = self.api.create_ticket(&payload);
        spinner.finish_and_clear();

        match result {
            Ok(id) => self.notice(
                Tone::Success,
                &format!("Chamado aberto com sucesso!\nCódigo: {id}"),
            ),
            Err(e) => {
                self.report_failure(&format!("Erro ao abrir chamado: {e}"), &e)?;
                self.notice(Tone::Error, "Erro ao abrir o chamado.")
            }
        }
    }

    /// Add-interaction form followed by confirmation and submission.
    pub fn add_interaction(&mut self) -> io::Result<()> {
        self.term.clear()?;
        self.banner(
            "INTERAÇÃO COM CHAMADO",
            "Adicione uma interação ao chamado existente",
        )?;

        match self.collect_interaction() {
            Ok(draft) => self.submit_interaction(&draft)?,
            Err(FormError::Io(e)) => return Err(e),
            Err(e) => self.notice(Tone::Error, &e.to_string())?,
        }
        self.pause()
    }

    fn collect_interaction(&mut self) -> Result<InteractionDraft, FormError> {
        let ticket_key = required(
            self.text("Digite a chave do chamado (ex: 1025-000133)")?,
            "Chave do chamado é obrigatória!",
        )?;

        let attendance_type = required(
            self.pick(Catalog::AttendanceTypes, "Selecione a Forma de Atendimento")?,
            "Forma de atendimento é obrigatória!",
        )?;

        let status = required(
            self.pick(Catalog::Statuses, "Selecione o Status")?,
            "Status é obrigatório!",
        )?;

        let description = required(
            self.text("Digite a descrição da interação")?,
            "Descrição é obrigatória!",
        )?;

        let operator = self.pick(Catalog::Operators, "Selecione o Operador (opcional)")?;
        let group = self.pick(Catalog::Groups, "Selecione o Grupo (opcional)")?;

        Ok(InteractionDraft {
            ticket_key,
            attendance_type,
            status,
            description,
            operator,
            group,
            window: InteractionWindow::ending_at((self.clock)()),
        })
    }

    fn submit_interaction(&mut self, draft: &InteractionDraft) -> io::Result<()> {
        self.summary("RESUMO DA INTERAÇÃO", &draft.summary())?;
        if !self.confirm("Confirmar interação? (S/N)")? {
            return self.notice(Tone::Warning, "Interação cancelada.");
        }

        self.notice(Tone::Info, "Adicionando interação...")?;
        let payload = draft.payload();
        debug!(?payload, "adding interaction");

        let spinner = self.term.busy("Enviando...");
        let result = self.api.add_interaction(&payload);
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => self.notice(
                Tone::Success,
                &format!("Interação adicionada com sucesso!\nResultado: {outcome}"),
            ),
            Err(e) => {
                self.report_failure(&format!("Erro ao interagir com chamado: {e}"), &e)?;
                self.notice(Tone::Error, "Erro ao adicionar interação.")
            }
        }
    }

    fn summary(&mut self, heading: &str, rows: &[(&'static str, String)]) -> io::Result<()> {
        let screen = self.term.screen();
        let out = self.term.writer();
        writeln!(out)?;
        screen.item(out, None, heading, None)?;
        writeln!(out)?;
        for (label, value) in rows {
            screen.item(out, None, label, Some(value))?;
        }
        writeln!(out)
    }

    /// Only the exact affirmative token confirms; anything else cancels.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(question)?
            .is_some_and(|answer| answer.trim() == AFFIRMATIVE))
    }

    fn report_failure(&mut self, message: &str, err: &DeskError) -> io::Result<()> {
        self.notice(Tone::Error, message)?;
        if let Some(detail) = err.detail() {
            self.notice(Tone::Error, &format!("Detalhes: {detail}"))?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let label = self.term.screen().prompt_label(prompt);
        self.term.read_line(&label)
    }

    fn pause(&mut self) -> io::Result<()> {
        writeln!(self.term.writer())?;
        self.ask("Pressione ENTER para continuar...")?;
        Ok(())
    }

    fn banner(&mut self, title: &str, subtitle: &str) -> io::Result<()> {
        let screen = self.term.screen();
        screen.banner(self.term.writer(), title, subtitle)
    }

    fn notice(&mut self, tone: Tone, message: &str) -> io::Result<()> {
        let screen = self.term.screen();
        screen.notice(self.term.writer(), tone, message)
    }
}
