// Simple REPL example that echoes what you type with "typed: " prefix

use emacsline::terminals::StdioTerminal;
use emacsline::{FilenameCompleter, LineEditor};

const HISTORY_FILE: &str = ".simple_repl_history";

fn main() -> emacsline::Result<()> {
    println!("Simple REPL - Type something and press Enter");
    println!("Type 'exit' or press Ctrl-D to quit");
    println!("Features: Emacs keys, history (C-P/C-N, C-R search), TAB file completion");
    println!();

    let mut editor = LineEditor::new(1024, 50);
    editor.set_completer(Some(Box::new(FilenameCompleter::new())));
    if let Err(e) = editor.history_mut().load(HISTORY_FILE) {
        eprintln!("(no history loaded: {e})");
    }

    #[cfg(unix)]
    let mut terminal = StdioTerminal::new();
    #[cfg(windows)]
    let mut terminal = StdioTerminal::new()?;

    while let Some(line) = editor.read_line(&mut terminal, "> ")? {
        let trimmed = line.trim();

        if trimmed == "exit" {
            break;
        } else if !trimmed.is_empty() {
            println!("typed: {trimmed}");
        }
    }

    println!("Goodbye!");
    editor.history().save(HISTORY_FILE)
}
