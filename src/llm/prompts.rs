//! Prompt templates for the gift-copy generation call.
//!
//! The conversation is fixed: a system instruction pinning the output shape,
//! a user message carrying the username and a response template, a user
//! message embedding the filtered repository list as JSON, and a final
//! reinforcement that the reply must be a JSON object keyed by `giftsData`.

/// System instruction fixing the output shape.
pub fn system_instruction() -> String {
    "You are a helpful JavaScript expert that always responds with a JSON array \
     of gift-entry objects with fields repoNumber, name, description, imageUrl, \
     and repoUrl."
        .to_string()
}

/// User message embedding the username and a template example of one entry.
pub fn response_template(username: &str) -> String {
    format!(
        r#"GitHub username: {username}

[response_template]
const giftsData = [
    {{
        repoNumber: 1,
        name: <repo_name>,
        description: <reason you think this repo is awesome>, // USE EMOJIS, MAX WORD COUNT 50, BE CREATIVE AND FESTIVE! ITS CHRISTMAS!
        imageUrl: <https://github.com/{username}.png>,
        repoUrl: <https://github.com/{username}/repo_name>
    }},
];

// IMPORTANT! RESPONSE MUST BE VALID JSON!
return {{'giftsData': giftsData}};
[/response_template]
"#
    )
}

/// User message embedding the serialized repository list. `repos_json` is the
/// JSON encoding of the `RepositorySummary` list.
pub fn context_message(repos_json: &str) -> String {
    format!(
        r#"[context]
{repos_json}
[/context]

Use the [context] to complete the giftsData array. MAX 6.
Pick your favorite repos, and tell me why you think they are awesome in the `description`.
Make your `description` creative and unique, and make it perfect for the holiday season. It's Christmas!
"#
    )
}

/// Final reinforcing instruction on the response envelope.
pub fn reinforce_json_object() -> String {
    "Respond with a JSON object that returns the giftsData array under the key 'giftsData'."
        .to_string()
}
