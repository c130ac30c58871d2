//! Image rotation slash command: /image

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::features::images::FREQUENCY_NAMES;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_image_command()]
}

fn create_image_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("image")
        .description("Handles publishing images from a directory on a schedule")
        .create_option(|list| {
            list.name("list")
                .description("Displays image schedule")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|schedule| {
            schedule
                .name("schedule")
                .description("Schedule automatic posting of images")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("directory")
                        .description("Directory containing images to schedule")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|o| {
                    o.name("frequency")
                        .description("Frequency of posting")
                        .kind(CommandOptionType::String)
                        .required(true);
                    for name in FREQUENCY_NAMES {
                        o.add_string_choice(name, name);
                    }
                    o
                })
                .create_sub_option(|o| {
                    o.name("hour")
                        .description("Hour to post images at")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(0)
                        .max_int_value(23)
                })
                .create_sub_option(|o| {
                    o.name("count")
                        .description("How many images to display each time")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                        .min_int_value(1)
                })
                .create_sub_option(|o| {
                    o.name("repeat")
                        .description("Enable to loop displaying images")
                        .kind(CommandOptionType::Boolean)
                        .required(true)
                })
        })
        .create_option(|next| {
            next.name("next")
                .description("Manually display next set of images")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|o| {
                    o.name("name")
                        .description("Image Block name (directory)")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_choices() {
        let commands = create_commands();
        let options = commands[0].0.get("options").unwrap().as_array().unwrap();
        let schedule = options
            .iter()
            .find(|o| o.get("name").unwrap() == "schedule")
            .unwrap();
        let frequency = &schedule.get("options").unwrap().as_array().unwrap()[1];
        let choices = frequency.get("choices").unwrap().as_array().unwrap();

        assert_eq!(choices.len(), 9);
        assert_eq!(choices[0].get("value").unwrap(), "manual");
    }
}
