//! Prompt text sent to the backend.

/// Sampling temperature the proxy uses for coding questions.
pub const CODING_PROXY_TEMPERATURE: f64 = 0.2;

/// Prompt for a full quiz of multiple-choice questions.
pub fn quiz_prompt(domain: &str) -> String {
    format!(
        r#"Create 20 multiple choice questions for a {domain} developer interview.
For each question:
1. Make it technical and specific to {domain}
2. Include 4 options
3. Mark the correct answer
4. Set difficulty (easy/medium/hard)

Format each question exactly like this example:
{{
    "text": "What is JavaScript?",
    "options": ["A programming language", "A database", "A web server", "An operating system"],
    "correctAnswer": "A programming language",
    "difficulty": "easy"
}}

Return an array of exactly 20 questions formatted as valid JSON."#
    )
}

/// Prompt for one coding question with a callable signature.
pub fn coding_prompt(domain: &str) -> String {
    format!(
        r#"Create 1 coding question for a {domain} role (web designer or frontend developer should get DOM/array/object problems suitable for in-browser JS).
For each question, provide fields EXACTLY as JSON with these keys:
{{
  "id": "Q1",
  "description": "Problem statement",
  "functionName": "filterProducts",
  "parameters": ["products", "query", "minPrice", "maxPrice"],
  "starterCode": "function filterProducts(products, query, minPrice, maxPrice) {{\n  // write your code here\n}}\n",
  "sampleInput": {{"products": [{{"name":"A","price":10}}], "query":"a", "minPrice":0, "maxPrice":20}},
  "sampleOutput": [{{"name":"A","price":10}}]
}}
"sampleInput" must be JSON serializable and match "parameters"; "sampleOutput" is the expected JSON serializable result.
Return an array of exactly 1 question as valid JSON."#
    )
}

/// Shorter quiz prompt used by the proxy server.
pub fn proxy_quiz_prompt(domain: &str) -> String {
    format!(
        "Create 20 multiple choice questions for a {domain} developer interview.\n\
         For each: {{text, options[4], correctAnswer, difficulty: easy|medium|hard}}. \
         Return an array of exactly 20."
    )
}

/// Shorter coding prompt used by the proxy server.
pub fn proxy_coding_prompt(domain: &str) -> String {
    format!(
        "Create 1 coding question for a {domain} role (frontend/web designer should prefer \
         DOM/array/object problems for in-browser JS).\n\
         Return JSON array with ONE object: {{id, description, functionName, parameters[], \
         starterCode, sampleInput, sampleOutput}}."
    )
}
