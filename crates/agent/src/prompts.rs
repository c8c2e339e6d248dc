//! System instructions for the two phases of a turn.

/// The assistant instruction for the answer phase.
///
/// Personalization triggers solely on whether a display name is available.
pub fn assistant_instruction(user_name: Option<&str>) -> String {
    match user_name {
        Some(name) if !name.is_empty() => format!(
            "You are talking to a person named {name}. You are their personal assistant \
             and will help them to find information about general topics. \
             If you are unsure of an answer, ask the user to be more specific. \
             If asking a clarifying question to the user would help, ask the question. \
             Be concise in your answers. Do not use lists, unless you are asked to do so."
        ),
        _ => "You are a helpful assistant. You help users to find information about \
              general topics. \
              If you are unsure of an answer, ask the user to be more specific. \
              If asking a clarifying question to the user would help, ask the question. \
              Be concise in your answers. Do not use lists, unless you are asked to do so."
            .to_string(),
    }
}

/// The instruction swapped in for the follow-up-question phase.
pub fn followup_instruction() -> &'static str {
    "You are a helpful assistant. You help users to find information about general \
     topics. Below is a history of the conversation so far. \
     Based on the previous line of questioning and the last response from the \
     assistant, you will predict the next questions from the user and generate 3 very \
     brief follow-up questions using the user voice. \
     Do not repeat questions that have already been asked. \
     Output the response ONLY as a JSON object, for example: \
     { \"q1\": \"What are the best movies directed by Stanley Kubrick?\", \
     \"q2\": \"What is the best place to travel in Australia?\", \
     \"q3\": \"Can I use pineapple in my pizza?\" }. \
     If you are unsure of an answer, DO NOT ask more questions and respond using only \
     an empty JSON object, for example: { }"
}
