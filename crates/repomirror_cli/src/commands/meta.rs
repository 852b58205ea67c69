//! Completions and man pages generated from the clap definition.

use std::io::Write;
use std::path::PathBuf;

use clap::CommandFactory;

use crate::Cli;

const BIN_NAME: &str = "repomirror";

fn render_completions(shell: clap_complete::Shell) -> Vec<u8> {
    let mut out = Vec::new();
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, &mut out);
    out
}

fn render_man_page() -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    clap_mangen::Man::new(Cli::command()).render(&mut out)?;
    Ok(out)
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    std::io::stdout().write_all(&render_completions(shell))?;
    Ok(())
}

/// Print the top-level page, or write one page per subcommand into `output`.
pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(dir) = output else {
        std::io::stdout().write_all(&render_man_page()?)?;
        return Ok(());
    };

    std::fs::create_dir_all(&dir)?;
    clap_mangen::generate_to(Cli::command(), &dir)?;
    println!("Generated man pages in: {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zsh_completions_mention_subcommands() {
        let script = String::from_utf8(render_completions(clap_complete::Shell::Zsh))
            .expect("completion output should be UTF-8");
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("sync"));
    }

    #[test]
    fn man_page_has_title_and_synopsis() {
        let page = String::from_utf8(render_man_page().expect("man page should render"))
            .expect("man output should be UTF-8")
            .to_lowercase();
        assert!(page.contains(".th repomirror"));
        assert!(page.contains("synopsis"));
    }
}
