//! Menu and form scenarios driven through a scripted terminal and a fake
//! transport.

use chrono::{NaiveDate, NaiveDateTime};
use desk_cli::testing::{FakeTransport, ScriptedTerminal, INTERRUPT};
use desk_cli::transport::Method;
use desk_cli::{ApiClient, Catalog, Desk};

const TICKETS: &str = "ChamadosSuporte";
const INTERACT: &str = "ChamadosSuporte/interagir";

/// Logged-in client whose catalogs each hold one record.
fn fixture() -> (FakeTransport, ApiClient<FakeTransport>) {
    let fake = FakeTransport::new();
    fake.reply("Login/autenticar", 200, "\"token-abc\"");
    fake.reply(
        "Usuarios/lista",
        200,
        r#"{"root":[{"Chave":"77","Nome":"Ana","Sobrenome":"Souza","Email":"ana@example.com","Cliente":"ACME"}]}"#,
    );
    fake.reply(
        "AutoCategorias/lista",
        200,
        r#"{"root":[{"Chave":"9","Assunto":"Troca de senha","NomeGrupo":"N1","Portal":"S"}]}"#,
    );
    fake.reply("Solicitacoes/lista", 200, r#"[{"Chave":"3","Nome":"Incidente"}]"#);
    fake.reply("TipoOcorrencias/lista", 200, r#"{"root":[{"Sequencia":12,"Nome":"Hardware"}]}"#);
    fake.reply("SubCategorias/lista", 200, r#"{"root":[{"Chave":"31","SubCategoria":"VPN"}]}"#);
    fake.reply("Grupos/lista", 200, r#"{"root":[{"Chave":"5","Nome":"Infra"}]}"#);
    fake.reply("FormaAtendimento/lista", 200, r#"{"root":[{"Chave":"2","Nome":"Telefone"}]}"#);
    fake.reply("Status/lista", 200, r#"{"root":[{"Sequencia":"4","Nome":"Em andamento"}]}"#);
    fake.reply(
        "GerenteOperador/lista",
        200,
        r#"{"root":[{"Chave":"8","Nome":"Carlos","Sobrenome":"Lima"}]}"#,
    );

    let mut api = ApiClient::new(fake.clone());
    api.authenticate("op-key", "env-key").expect("login");
    (fake, api)
}

fn run(api: &ApiClient<FakeTransport>, inputs: &[&str]) -> ScriptedTerminal {
    let mut term = ScriptedTerminal::new(inputs.iter().copied());
    Desk::new(api, &mut term)
        .with_clock(just_after_midnight)
        .run()
        .expect("menu loop");
    term
}

fn just_after_midnight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 1, 30)
        .unwrap()
}

#[test]
fn listing_categories_shows_each_record() {
    let (fake, api) = fixture();
    fake.reply("Categorias/lista", 200, r#"{"root":[{"Chave":"1","Nome":"Hardware"}]}"#);

    let term = run(&api, &["5", "", "0"]);
    let out = term.output();

    assert!(out.contains("Total: 1 registro(s)"), "{out}");
    assert!(out.contains("[1]"));
    assert!(out.contains("Chave: 1"));
    assert!(out.contains("Nome: Hardware"));
    assert!(out.contains("Encerrando o sistema..."));

    let request = fake.last_request("Categorias/lista").unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.authorization, "token-abc");
    assert_eq!(request.body["Ativo"], "S");
}

#[test]
fn listing_fills_missing_columns() {
    let (_fake, api) = fixture();
    let term = run(&api, &["3", "", "", "0"]);
    let out = term.output();
    assert!(out.contains("Chave: 77"));
    assert!(out.contains("Sobrenome: Souza"));
    assert!(out.contains("Cliente: ACME"));

    let (fake, api) = fixture();
    fake.reply("Usuarios/lista", 200, r#"{"root":[{"Chave":"78","Nome":"Bruno"}]}"#);
    let out = run(&api, &["3", "", "", "0"]).output();
    assert!(out.contains("Sobrenome: N/A"));
    assert!(out.contains("Email: N/A"));
}

#[test]
fn requester_listing_sends_search_text() {
    let (fake, api) = fixture();
    run(&api, &["3", "souza", "", "0"]);
    let request = fake.last_request("Usuarios/lista").unwrap();
    assert_eq!(request.body["Pesquisa"], "souza");
    assert_eq!(request.body["Colunas"]["Sobrenome"], "on");
}

#[test]
fn failed_listing_reads_as_empty() {
    let (fake, api) = fixture();
    fake.reply("Categorias/lista", 200, r#"{"erro":"Token expirado"}"#);
    let failed = run(&api, &["5", "", "0"]).output();
    assert!(failed.contains("Token expirado"));
    assert!(failed.contains("Nenhum(a) categorias encontrado(a)."));

    fake.reply("Categorias/lista", 200, r#"{"root":[]}"#);
    let empty = run(&api, &["5", "", "0"]).output();
    assert!(empty.contains("Nenhum(a) categorias encontrado(a)."));
    assert!(!empty.contains("Erro"));
}

#[test]
fn invalid_menu_choices_are_recovered() {
    let (_fake, api) = fixture();
    let term = run(&api, &["99", "", "abc", "", "0"]);
    let out = term.output();
    assert_eq!(out.matches("Opção inválida!").count(), 2);
    assert!(out.contains("Encerrando o sistema..."));
    assert_eq!(term.remaining_inputs(), 0);
}

#[test]
fn interrupt_at_menu_exits() {
    let (_fake, api) = fixture();
    let term = run(&api, &[INTERRUPT, "5"]);
    assert!(term.output().contains("Encerrando o sistema..."));
    assert_eq!(term.remaining_inputs(), 1);
}

#[test]
fn open_ticket_with_subject_and_subcategory() {
    let (fake, api) = fixture();
    fake.reply(TICKETS, 200, "\"1025-000200\"");

    let term = run(
        &api,
        &[
            "1",                    // menu
            "1",                    // requester
            "0",                    // no auto-category
            "Sem acesso à VPN",     // subject
            "Erro 809 ao conectar", // description
            "1",                    // request type
            "1",                    // occurrence type
            "1",                    // subcategory
            "2",                    // impact
            "x",                    // urgency
            "1",                    // transfer group
            "S",                    // confirm
            "",                     // pause
            "0",
        ],
    );
    let out = term.output();
    assert!(out.contains("Chamado aberto com sucesso!"), "{out}");
    assert!(out.contains("Código: 1025-000200"));
    assert!(out.contains("Impacto: Médio"));
    assert!(out.contains("Urgência: Baixa"));

    let put = fake.last_request(TICKETS).unwrap();
    assert_eq!(put.method, Method::Put);
    let ticket = &put.body["TChamado"];
    assert_eq!(ticket["Solicitante"], "77");
    assert_eq!(ticket["Email"], "ana@example.com");
    assert_eq!(ticket["Assunto"], "Sem acesso à VPN");
    assert_eq!(ticket["Categoria"], "31");
    assert_eq!(ticket["Descricao"], "Erro 809 ao conectar");
    assert_eq!(ticket["Solicitacao"], "3");
    assert_eq!(ticket["TipoOcorrencia"], "12");
    assert_eq!(ticket["Impacto"], "000002");
    assert_eq!(ticket["Urgencia"], "000003");
    assert_eq!(ticket["TransfCodGrupo"], "5");
    assert!(ticket.get("AutoCategoria").is_none());
}

#[test]
fn open_ticket_with_auto_category_skips_subject_and_subcategory() {
    let (fake, api) = fixture();
    fake.reply(TICKETS, 200, "\"1025-000201\"");

    let term = run(
        &api,
        &["1", "1", "1", "Reset de senha do ERP", "1", "1", "1", "1", "0", "S", "", "0"],
    );
    assert!(term.output().contains("Auto-Categoria: Troca de senha"));
    assert_eq!(fake.calls_to("SubCategorias/lista"), 0);
    assert!(!term.prompts().iter().any(|p| p.contains("Assunto")));

    let ticket = fake.last_request(TICKETS).unwrap().body["TChamado"].clone();
    assert_eq!(ticket["AutoCategoria"], "9");
    assert!(ticket.get("Assunto").is_none());
    assert!(ticket.get("Categoria").is_none());
    assert!(ticket.get("TransfCodGrupo").is_none());
    assert_eq!(ticket["Impacto"], "000001");
}

#[test]
fn empty_subject_aborts_without_submitting() {
    let (fake, api) = fixture();
    let term = run(&api, &["1", "1", "0", "   ", "", "0"]);
    let out = term.output();
    assert!(out.contains("Assunto é obrigatório quando não há auto-categoria!"));
    assert_eq!(fake.calls_to(TICKETS), 0);
    assert_eq!(fake.calls_to("Solicitacoes/lista"), 0);
}

#[test]
fn skipping_requester_aborts() {
    let (fake, api) = fixture();
    let term = run(&api, &["1", "0", "", "0"]);
    assert!(term.output().contains("Solicitante é obrigatório!"));
    assert_eq!(fake.calls_to("AutoCategorias/lista"), 0);
}

#[test]
fn anything_but_exact_affirmative_cancels() {
    for answer in ["s", "sim", "N", ""] {
        let (fake, api) = fixture();
        let term = run(
            &api,
            &["1", "1", "1", "Descrição", "1", "1", "3", "3", "0", answer, "", "0"],
        );
        assert!(term.output().contains("Abertura cancelada."), "answer {answer:?}");
        assert_eq!(fake.calls_to(TICKETS), 0, "answer {answer:?}");
    }
}

#[test]
fn rejected_ticket_shows_server_detail() {
    let (fake, api) = fixture();
    fake.reply(TICKETS, 400, r#"{"Solicitante":"inválido"}"#);
    let term = run(
        &api,
        &["1", "1", "1", "Descrição", "1", "1", "1", "1", "0", "S", "", "0"],
    );
    let out = term.output();
    assert!(out.contains("Erro ao abrir chamado: HTTP 400"));
    assert!(out.contains(r#"Detalhes: {"Solicitante":"inválido"}"#));
    assert!(out.contains("Erro ao abrir o chamado."));
}

#[test]
fn empty_ticket_reply_is_a_failure() {
    for body in ["null", "\"\"", "{}"] {
        let (fake, api) = fixture();
        fake.reply(TICKETS, 200, body);
        let term = run(
            &api,
            &["1", "1", "1", "Descrição", "1", "1", "1", "1", "0", "S", "", "0"],
        );
        let out = term.output();
        assert!(out.contains("Erro ao abrir o chamado."), "body {body}: {out}");
        assert!(!out.contains("Chamado aberto com sucesso!"), "body {body}");
    }
}

#[test]
fn ticket_erro_reply_is_a_failure() {
    let (fake, api) = fixture();
    fake.reply(TICKETS, 200, r#"{"erro":"Solicitante inativo"}"#);
    let term = run(
        &api,
        &["1", "1", "1", "Descrição", "1", "1", "1", "1", "0", "S", "", "0"],
    );
    let out = term.output();
    assert!(out.contains("Erro ao abrir chamado: Solicitante inativo"), "{out}");
    assert!(out.contains("Erro ao abrir o chamado."));
}

/// Interaction answers up to (not including) the confirmation.
const INTERACTION_FORM: [&str; 7] = ["2", "1025-000133", "1", "1", "Cliente contatado", "0", "0"];

fn interaction_run(api: &ApiClient<FakeTransport>, confirm: &str) -> ScriptedTerminal {
    let mut inputs = INTERACTION_FORM.to_vec();
    inputs.extend([confirm, "", "0"]);
    run(api, &inputs)
}

#[test]
fn interaction_cancels_unless_exact_affirmative() {
    for answer in ["s", "N", ""] {
        let (fake, api) = fixture();
        let term = interaction_run(&api, answer);
        assert!(term.output().contains("Interação cancelada."), "answer {answer:?}");
        assert_eq!(fake.calls_to(INTERACT), 0, "answer {answer:?}");
    }
}

#[test]
fn rejected_interaction_shows_server_detail() {
    let (fake, api) = fixture();
    fake.reply(INTERACT, 404, "Chamado não encontrado");
    let term = interaction_run(&api, "S");
    let out = term.output();
    assert!(out.contains("Erro ao interagir com chamado: HTTP 404"), "{out}");
    assert!(out.contains("Detalhes: Chamado não encontrado"));
    assert!(out.contains("Erro ao adicionar interação."));
    assert!(!out.contains("Interação adicionada com sucesso!"));
}

#[test]
fn interaction_erro_or_empty_reply_is_a_failure() {
    for body in [r#"{"erro":"Chamado encerrado"}"#, "null"] {
        let (fake, api) = fixture();
        fake.reply(INTERACT, 200, body);
        let term = interaction_run(&api, "S");
        let out = term.output();
        assert!(out.contains("Erro ao adicionar interação."), "body {body}: {out}");
        assert!(!out.contains("Interação adicionada com sucesso!"), "body {body}");
    }
}

#[test]
fn add_interaction_stamps_a_two_minute_window() {
    let (fake, api) = fixture();
    fake.reply(INTERACT, 200, r#"{"Chave":"1025-000133"}"#);

    let term = run(
        &api,
        &[
            "2",
            "1025-000133",       // ticket key
            "1",                 // attendance type
            "1",                 // status
            "Cliente contatado", // description
            "1",                 // operator
            "0",                 // no group
            "S",
            "",
            "0",
        ],
    );
    let out = term.output();
    assert!(out.contains("Interação adicionada com sucesso!"), "{out}");
    assert!(out.contains("Data/Hora: 01-03-2024 23:59 - 00:01"));

    let put = fake.last_request(INTERACT).unwrap();
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.body["Chave"], "1025-000133");
    let t = &put.body["TChamado"];
    assert_eq!(t["CodFormaAtendimento"], "2");
    assert_eq!(t["CodStatus"], "4");
    assert_eq!(t["Descricao"], "Cliente contatado");
    assert_eq!(t["CodOperador"], "8");
    assert!(t.get("CodGrupo").is_none());
    assert_eq!(t["DataInteracao"], "01-03-2024");
    assert_eq!(t["HoraInicial"], "23:59");
    assert_eq!(t["HoraFinal"], "00:01");
}

#[test]
fn interaction_requires_status() {
    let (fake, api) = fixture();
    let term = run(&api, &["2", "1025-000133", "1", "0", "", "0"]);
    assert!(term.output().contains("Status é obrigatório!"));
    assert_eq!(fake.calls_to(INTERACT), 0);
}

#[test]
fn interaction_requires_ticket_key() {
    let (fake, api) = fixture();
    let term = run(&api, &["2", "", "", "0"]);
    assert!(term.output().contains("Chave do chamado é obrigatória!"));
    assert_eq!(fake.calls_to("FormaAtendimento/lista"), 0);
}

#[test]
fn selector_reprompts_until_valid_or_skipped() {
    let (fake, api) = fixture();
    let items = api.list(Catalog::Groups, "").unwrap();
    assert_eq!(fake.calls_to("Grupos/lista"), 1);

    let mut term = ScriptedTerminal::new(["abc", "7", "1"]);
    let chosen = Desk::new(&api, &mut term)
        .choose(&items, "Grupo", "Grupos", "Nome", "Chave")
        .unwrap();
    assert_eq!(chosen.unwrap().key.as_deref(), Some("5"));
    let out = term.output();
    assert!(out.contains("Digite um número válido!"));
    assert!(out.contains("Opção inválida!"));
    assert!(out.contains("1. Infra: Código: 5"));
    assert!(out.contains("0. Pular esta seleção"));

    let mut term = ScriptedTerminal::new(["0"]);
    let skipped = Desk::new(&api, &mut term)
        .choose(&items, "Grupo", "Grupos", "Nome", "Chave")
        .unwrap();
    assert!(skipped.is_none());

    let mut term = ScriptedTerminal::new([INTERRUPT, "1"]);
    let interrupted = Desk::new(&api, &mut term)
        .choose(&items, "Grupo", "Grupos", "Nome", "Chave")
        .unwrap();
    assert!(interrupted.is_none());
    assert_eq!(term.remaining_inputs(), 1);
}

#[test]
fn selector_on_empty_list_does_not_prompt() {
    let (_fake, api) = fixture();
    let mut term = ScriptedTerminal::new(["1"]);
    let chosen = Desk::new(&api, &mut term)
        .choose(&[], "Grupo", "Grupos", "Nome", "Chave")
        .unwrap();
    assert!(chosen.is_none());
    assert!(term.output().contains("Nenhum(a) grupos disponível."));
    assert_eq!(term.remaining_inputs(), 1);
}
