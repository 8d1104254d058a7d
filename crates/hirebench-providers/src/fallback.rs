//! Static question sets served when the backend is unavailable.

use serde_json::json;

use hirebench_core::model::{Difficulty, QuestionSpec, QuizQuestion, QUIZ_QUESTION_COUNT};

const FALLBACK_OPTIONS: [&str; 4] = [
    "To track changes in code",
    "To compile code faster",
    "To debug applications",
    "To deploy applications",
];

/// Twenty placeholder quiz questions with a fixed difficulty pattern.
pub fn fallback_quiz_questions() -> Vec<QuizQuestion> {
    (0..QUIZ_QUESTION_COUNT)
        .map(|i| QuizQuestion {
            text: format!(
                "Fallback Q{}: What is the primary purpose of version control systems?",
                i + 1
            ),
            options: FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect(),
            correct_answer: FALLBACK_OPTIONS[0].to_string(),
            difficulty: fallback_difficulty(i),
        })
        .collect()
}

fn fallback_difficulty(index: usize) -> Difficulty {
    if index % 3 == 0 {
        Difficulty::Hard
    } else if index % 2 == 0 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// The built-in `filterProducts` exercise.
pub fn fallback_coding_questions() -> Vec<QuestionSpec> {
    vec![QuestionSpec {
        id: "Q1".to_string(),
        description: "Implement filterProducts that returns products whose name contains the \
                      query (case-insensitive) and price within [minPrice,maxPrice] if provided."
            .to_string(),
        function_name: "filterProducts".to_string(),
        parameters: ["products", "query", "minPrice", "maxPrice"]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        starter_code: "function filterProducts(products, query, minPrice, maxPrice) {\n  \
                       // name contains query (case-insensitive)\n  \
                       // apply minPrice/maxPrice if they are numbers; ignore if null/undefined\n  \
                       // return a new filtered array\n}\n"
            .to_string(),
        sample_input: json!({
            "products": [
                {"name": "Mouse", "price": 499},
                {"name": "Keyboard", "price": 1299},
                {"name": "House", "price": 9999}
            ],
            "query": "ou",
            "minPrice": 300,
            "maxPrice": 2000
        }),
        sample_output: json!([{"name": "Mouse", "price": 499}]),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hirebench_core::parser::validate_question_spec;

    #[test]
    fn quiz_fallback_shape() {
        let questions = fallback_quiz_questions();
        assert_eq!(questions.len(), 20);
        assert_eq!(
            questions[0].text,
            "Fallback Q1: What is the primary purpose of version control systems?"
        );
        assert!(questions[19].text.starts_with("Fallback Q20:"));
        for q in &questions {
            assert_eq!(q.options.len(), 4);
            assert!(q.options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn quiz_fallback_difficulty_pattern() {
        let difficulties: Vec<Difficulty> = fallback_quiz_questions()
            .iter()
            .map(|q| q.difficulty)
            .take(7)
            .collect();
        assert_eq!(
            difficulties,
            vec![
                Difficulty::Hard,
                Difficulty::Easy,
                Difficulty::Medium,
                Difficulty::Hard,
                Difficulty::Medium,
                Difficulty::Easy,
                Difficulty::Hard,
            ]
        );
    }

    #[test]
    fn coding_fallback_is_consistent() {
        let questions = fallback_coding_questions();
        assert_eq!(questions.len(), 1);
        let spec = &questions[0];
        assert!(validate_question_spec(spec).is_empty());
        assert!(spec.starter_code.contains("// apply minPrice/maxPrice"));
        assert!(spec.starter_code.ends_with("}\n"));
    }
}
