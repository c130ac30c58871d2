//! Recurring reminder slash command: /reminder

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_reminder_command()]
}

fn create_reminder_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("reminder")
        .description("Create and register for reminders")
        .create_option(|list| {
            list.name("list")
                .description("Display all current reminders")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|create| {
            create
                .name("create")
                .description("Create a new reminder")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("name")
                        .description("Name of the reminder")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|o| {
                    o.name("days")
                        .description("Days to send reminder (Any combination of UMTWRFS日月火水木金土)")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|o| {
                    o.name("hour")
                        .description("Hour (0-23)")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                        .max_int_value(23)
                })
                .create_sub_option(|o| {
                    o.name("minute")
                        .description("Minute (0-59)")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                        .max_int_value(59)
                })
        })
        .create_option(|subscribe| {
            subscribe
                .name("subscribe")
                .description("Subscribe to a reminder")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("index")
                        .description("Reminder index")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                })
        })
        .create_option(|unsubscribe| {
            unsubscribe
                .name("unsubscribe")
                .description("Unsubscribe from a reminder")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("index")
                        .description("Reminder index")
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
    fn test_create_reminder_command() {
        let commands = create_commands();
        let command = &commands[0];
        assert_eq!(command.0.get("name").unwrap().as_str().unwrap(), "reminder");

        let options = command.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options.len(), 4);

        let create = &options[1];
        assert_eq!(create.get("name").unwrap().as_str().unwrap(), "create");
        assert_eq!(create.get("options").unwrap().as_array().unwrap().len(), 4);
    }
}
