//! Release tracking slash command: /release-watch

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

const DATE_HELP: &str = "Release date (MM/DD/YYYY, QXYYYY, or Freeform)";

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_release_watch_command()]
}

fn create_release_watch_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("release-watch")
        .description("Track upcoming releases")
        .create_option(|list| {
            list.name("list")
                .description("Displays all currently tracked releases")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|track| {
            track
                .name("track")
                .description("Add a new release to be tracked")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("name")
                        .description("Name of the thing being released")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|o| {
                    o.name("date")
                        .description(DATE_HELP)
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .create_option(|edit| {
            edit.name("edit")
                .description("Edit the release date for a specified release")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("index")
                        .description("Index of the release to edit")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                })
                .create_sub_option(|o| {
                    o.name("date")
                        .description(DATE_HELP)
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .create_option(|delete| {
            delete
                .name("delete")
                .description("Remove a release from tracking")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("index")
                        .description("Index of the release to untrack")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                })
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_watch_subcommands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let command = &commands[0];
        assert_eq!(
            command.0.get("name").unwrap().as_str().unwrap(),
            "release-watch"
        );

        let names: Vec<&str> = command
            .0
            .get("options")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["list", "track", "edit", "delete"]);
    }
}
