// Command prompt with completion from a fixed word list

use emacsline::terminals::StdioTerminal;
use emacsline::{LineEditor, WordListCompleter};

const COMMANDS: &[&str] = &["foo ", "bar ", "bsd ", "cli ", "ls ", "cd ", "malloc ", "tee "];

fn main() -> emacsline::Result<()> {
    let mut editor = LineEditor::new(256, 15);
    editor.set_completer(Some(Box::new(WordListCompleter::new(COMMANDS.iter().copied()))));

    #[cfg(unix)]
    let mut terminal = StdioTerminal::new();
    #[cfg(windows)]
    let mut terminal = StdioTerminal::new()?;

    while let Some(line) = editor.read_line(&mut terminal, "cli> ")? {
        println!("\t\t\t|{line}|");
    }
    Ok(())
}
