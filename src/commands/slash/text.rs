//! Small one-shot slash commands: /ac, /whats-my-ip

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_alternating_case_commands() -> Vec<CreateApplicationCommand> {
    vec![CreateApplicationCommand::default()
        .name("ac")
        .description("rEpEaT YoUr tExT LiKe tHiS")
        .create_option(|option| {
            option
                .name("text")
                .description("Text to alternate")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()]
}

pub fn create_public_ip_commands() -> Vec<CreateApplicationCommand> {
    vec![CreateApplicationCommand::default()
        .name("whats-my-ip")
        .description("Asks the bot to disclose its publicly-facing IP")
        .to_owned()]
}
