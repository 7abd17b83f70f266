//! Prompt templates

use crate::recipe::{Recipe, RecipeField};

const PROMPT_TEMPLATE: &str = "You're a \"Fridge Chef\", a helpful cooking assistant. \n\
The user will give you a list of vegetables or ingredients they have available.\n\
Base your answer only on the recipes in the CONTEXT.\n\
If you cannot find an exact match, suggest the closest dishes using the available ingredients.\n\
\n\
QUESTION: {question}\n\
\n\
CONTEXT: \n\
{context}";

const JUDGE_TEMPLATE: &str = r#"You are an expert evaluator for a RAG system.
Your task is to analyze the relevance of the generated answer to the given question.
Based on the relevance of the generated answer, you will classify it
as "NON_RELEVANT", "PARTLY_RELEVANT", or "RELEVANT".

Here is the data for evaluation:

Question: {question}
Generated Answer: {answer_llm}

Please analyze the content and context of the generated answer in relation to the question
and provide your evaluation in parsable JSON without using code blocks:

{
  "Relevance": "NON_RELEVANT" | "PARTLY_RELEVANT" | "RELEVANT",
  "Explanation": "[Provide a brief explanation for your evaluation]"
}"#;

/// Render one recipe as `field: value` lines in field order
pub fn render_entry(recipe: &Recipe) -> String {
    RecipeField::ALL
        .iter()
        .map(|field| format!("{}: {}", field, recipe.field(*field)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the answer prompt from the retrieved recipes, in result order
pub fn build_prompt<'a, I>(question: &str, recipes: I) -> String
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let context = recipes
        .into_iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n\n");

    fill(PROMPT_TEMPLATE, &[("question", question), ("context", &context)])
}

/// Build the prompt that asks the model to grade an answer
pub fn build_judge_prompt(question: &str, answer: &str) -> String {
    fill(JUDGE_TEMPLATE, &[("question", question), ("answer_llm", answer)])
}

// Placeholders are substituted in one pass so values containing `{...}`
// are never expanded again.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        for (name, value) in values {
            let placeholder_len = name.len() + 2;
            if tail.len() >= placeholder_len
                && tail[1..].starts_with(name)
                && tail[1 + name.len()..].starts_with('}')
            {
                out.push_str(value);
                rest = &tail[placeholder_len..];
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);

    out.trim().to_string()
}
