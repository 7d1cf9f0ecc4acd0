/// Build the string the ranker matches against for an application.
///
/// Launch commands often carry a second, more technical name (the binary or
/// package name) that users type instead of the display name. When the
/// command yields such a name and the display name does not already cover
/// it, it is appended after a space. Otherwise the display name is returned
/// unchanged.
pub fn derive(display_name: &str, launch_command: Option<&str>) -> String {
    let Some(executable) = launch_command.and_then(executable_name) else {
        return display_name.to_string();
    };

    if is_redundant(display_name, executable) {
        display_name.to_string()
    } else {
        format!("{display_name} {executable}")
    }
}

fn executable_name(command: &str) -> Option<&str> {
    let token = command
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|token| !token.is_empty())
        .find(|token| !is_field_code(token) && !is_env_assignment(token) && !token.starts_with('-'))?;

    token.rsplit('/').find(|segment| !segment.is_empty())
}

/// `%f`, `%U`, `%i`, ... are substituted by the launching environment.
fn is_field_code(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('%'), Some(_), None)
    )
}

fn is_env_assignment(token: &str) -> bool {
    match token.split_once('=') {
        Some((key, _)) => {
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// The executable adds nothing when the display name already contains it,
/// or when the whole display name appears as a run of its words
/// (`Calendar` in `gnome-calendar`, but not `Term` in `xterm`).
fn is_redundant(display_name: &str, executable: &str) -> bool {
    let name = normalize(display_name);
    let executable = normalize(executable);
    if executable.is_empty() || name.contains(&executable) {
        return true;
    }

    let name_words: Vec<&str> = name.split(' ').filter(|w| !w.is_empty()).collect();
    let executable_words: Vec<&str> = executable.split(' ').collect();
    !name_words.is_empty()
        && executable_words
            .windows(name_words.len())
            .any(|run| run == name_words.as_slice())
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '-' | '_' | '.' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
