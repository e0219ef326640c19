use crate::domain::{ClickTarget, DealSource, Renderer, SortKey};
use crate::error::Result;
use crate::services::CatalogService;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

const HELP: &str = "\
comandos:
  search <texto>   filtra por título (vacío = todos)
  sort <clave>     rating | recent | name | none
  more             carga la siguiente página
  open <n>         muestra el detalle de la tarjeta n
  close            cierra el detalle
  overlay          clic en el fondo del detalle
  inside           clic dentro del detalle
  reload           vuelve a cargar desde cero
  help             esta ayuda
  quit             salir";

/// One line of user input, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Sort(SortKey),
    More,
    Open(usize),
    Close,
    Click(ClickTarget),
    Reload,
    Help,
    Quit,
}

pub fn parse_action(line: &str) -> std::result::Result<Action, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word.to_lowercase().as_str() {
        "search" | "s" => Ok(Action::Search(rest.to_string())),
        "sort" => rest.parse().map(Action::Sort),
        "more" | "m" => Ok(Action::More),
        "open" | "o" => rest
            .parse()
            .map(Action::Open)
            .map_err(|_| format!("'{rest}' no es una posición válida")),
        "close" | "c" => Ok(Action::Close),
        "overlay" => Ok(Action::Click(ClickTarget::Overlay)),
        "inside" => Ok(Action::Click(ClickTarget::Content)),
        "reload" => Ok(Action::Reload),
        "help" | "?" | "" => Ok(Action::Help),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        other => Err(format!("comando desconocido '{other}', prueba 'help'")),
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run<S, R>(catalog: &mut CatalogService<S, R>) -> Result<()>
where
    S: DealSource,
    R: Renderer,
{
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    catalog.initial_load().await;
    stdout.write_all(b"escribe 'help' para ver los comandos\n").await?;

    loop {
        let prompt = match (catalog.state().detail_open(), catalog.state().search_active()) {
            (true, _) => "(detalle) > ",
            (false, true) => "(filtro) > ",
            (false, false) => "> ",
        };
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(message) => {
                stdout.write_all(format!("{message}\n").as_bytes()).await?;
                continue;
            }
        };
        debug!("Action: {:?}", action);

        match action {
            Action::Search(term) => catalog.search(&term),
            Action::Sort(key) => catalog.set_sort(key),
            Action::More => catalog.load_more().await,
            Action::Open(position) => {
                if !catalog.open_detail(position) {
                    stdout
                        .write_all(format!("no hay tarjeta en la posición {position}\n").as_bytes())
                        .await?;
                }
            }
            Action::Close => catalog.close_detail(),
            Action::Click(target) => catalog.overlay_click(target),
            Action::Reload => catalog.initial_load().await,
            Action::Help => stdout.write_all(format!("{HELP}\n").as_bytes()).await?,
            Action::Quit => break,
        }
    }

    Ok(())
}
