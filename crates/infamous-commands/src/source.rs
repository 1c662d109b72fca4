//! Links to the code behind each command.

use crate::framework::{Context, Error};

/// Directory holding the command modules, relative to the repository root.
const COMMANDS_DIR: &str = "crates/infamous-commands/src";

/// Resolves a space or dot separated command path, aliases included.
pub fn find_command<'a, U, E>(
    commands: &'a [poise::Command<U, E>],
    path: &str,
) -> Option<&'a poise::Command<U, E>> {
    let normalized = path.replace('.', " ");
    let mut words = normalized.split_whitespace();

    let matches = |command: &poise::Command<U, E>, word: &str| {
        command.name.eq_ignore_ascii_case(word)
            || command.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(word))
    };

    let first = words.next()?;
    let mut found = commands.iter().find(|c| matches(c, first))?;
    for word in words {
        found = found.subcommands.iter().find(|c| matches(c, word))?;
    }
    Some(found)
}

/// URL of the module defining commands of `category`.
pub fn source_url(repository: &str, category: &str) -> String {
    format!(
        "{}/blob/master/{COMMANDS_DIR}/{category}.rs",
        repository.trim_end_matches('/')
    )
}

/// Shows source code for each command.
#[poise::command(prefix_command, hide_in_help, category = "source")]
pub async fn source(ctx: Context<'_>, #[rest] command: Option<String>) -> Result<(), Error> {
    let Some(repository) = ctx.data().config.source.repository_url.clone() else {
        ctx.say("No source repository is configured.").await?;
        return Ok(());
    };

    let Some(command) = command else {
        ctx.say(repository).await?;
        return Ok(());
    };

    let category = find_command(&ctx.framework().options.commands, &command)
        .and_then(|found| found.category.clone());

    match category {
        Some(category) => ctx.say(source_url(&repository, &category)).await?,
        None => ctx.say("Could not find command.").await?,
    };
    Ok(())
}
