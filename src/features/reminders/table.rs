//! Fixed-width table used by `/reminder list`

use super::Reminder;

const COLUMNS: [&str; 10] = ["ID", "Name", "Time", "U", "M", "T", "W", "R", "F", "S"];
const MIN_WIDTHS: [usize; 10] = [2, 4, 5, 1, 1, 1, 1, 1, 1, 1];

const DAY_ACTIVE: &str = "[ X ]";
const DAY_INACTIVE: &str = "[   ]";

/// Render a channel's reminders as a code-block table.
///
/// ```text
/// [ ID ][ Name ][ Time  ][ U ][ M ][ T ][ W ][ R ][ F ][ S ]
/// [ 0  ][ Hmm  ][ 10:30 ][   ][   ][ X ][   ][   ][   ][   ]
/// ```
pub fn format_reminder_table(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "```<No reminders>```".to_string();
    }

    let mut widths = MIN_WIDTHS;
    widths[0] = widths[0].max(reminders.len().to_string().len());
    widths[1] = reminders
        .iter()
        .map(|r| r.name.chars().count())
        .fold(widths[1], usize::max);

    let mut table = String::from("```");
    for (column, width) in COLUMNS.iter().zip(widths) {
        table.push_str(&cell(column, width));
    }
    table.push('\n');

    for (index, reminder) in reminders.iter().enumerate() {
        table.push_str(&cell(&index.to_string(), widths[0]));
        table.push_str(&cell(&reminder.name, widths[1]));
        table.push_str(&cell(&format_time(reminder.hour, reminder.minute), widths[2]));
        for day in 0..7 {
            table.push_str(if reminder.days.contains(&day) {
                DAY_ACTIVE
            } else {
                DAY_INACTIVE
            });
        }
        table.push('\n');
    }

    table.push_str("```");
    table
}

/// `H:MM`. Minutes are zero-padded so `7:05` never reads as `7:5`.
fn format_time(hour: u32, minute: u32) -> String {
    format!("{hour}:{minute:02}")
}

fn cell(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(value.chars().count());
    format!("[ {value}{} ]", " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_pads_minutes_only() {
        assert_eq!(format_time(7, 5), "7:05");
        assert_eq!(format_time(0, 0), "0:00");
        assert_eq!(format_time(23, 59), "23:59");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_reminder_table(&[]), "```<No reminders>```");
    }

    #[test]
    fn test_table_layout() {
        let reminders = vec![Reminder {
            name: "Hmm".to_string(),
            hour: 10,
            minute: 30,
            days: vec![2],
            notifyees: vec![1],
        }];

        let expected = concat!(
            "```",
            "[ ID ][ Name ][ Time  ][ U ][ M ][ T ][ W ][ R ][ F ][ S ]\n",
            "[ 0  ][ Hmm  ][ 10:30 ][   ][   ][ X ][   ][   ][   ][   ]\n",
            "```"
        );
        assert_eq!(format_reminder_table(&reminders), expected);
    }

    #[test]
    fn test_long_names_widen_column() {
        let reminders = vec![
            Reminder {
                name: "Take out the trash".to_string(),
                hour: 7,
                minute: 5,
                days: vec![0, 6],
                ..Default::default()
            },
            Reminder {
                name: "Gym".to_string(),
                ..Default::default()
            },
        ];

        let table = format_reminder_table(&reminders);
        let lines: Vec<&str> = table.trim_matches('`').lines().collect();
        assert_eq!(
            lines[1],
            "[ 0  ][ Take out the trash ][ 7:05  ][ X ][   ][   ][   ][   ][   ][ X ]"
        );
        assert!(lines[2].starts_with("[ 1  ][ Gym                ][ 0:00  ]"));
        // Every row is the same width
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }
}
