//! Per-candidate assessment state.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvaluationResult, Language, QuestionSpec, QuizQuestion, QUIZ_QUESTION_COUNT};

/// Outcome of answering a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizProgress {
    /// Moved on to the question at this index.
    Next(usize),
    /// That was the last question.
    Finished,
}

/// State of one assessment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub domain: String,
    pub coding_only: bool,
    pub quiz_questions: Vec<QuizQuestion>,
    pub coding_questions: Vec<QuestionSpec>,
    pub current_quiz_index: usize,
    pub quiz_score: u32,
    pub coding_score: u32,
    submitted: BTreeSet<usize>,
    #[serde(skip)]
    saved_code: HashMap<(usize, Language), String>,
}

impl SessionState {
    pub fn new(domain: impl Into<String>, coding_only: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            domain: domain.into(),
            coding_only,
            quiz_questions: Vec::new(),
            coding_questions: Vec::new(),
            current_quiz_index: 0,
            quiz_score: 0,
            coding_score: 0,
            submitted: BTreeSet::new(),
            saved_code: HashMap::new(),
        }
    }

    pub fn current_quiz_question(&self) -> Option<&QuizQuestion> {
        self.quiz_questions.get(self.current_quiz_index)
    }

    /// Record an answer (or `None` when the countdown ran out) for the
    /// current question and move to the next one.
    pub fn answer_quiz(&mut self, answer: Option<&str>) -> QuizProgress {
        if let (Some(question), Some(answer)) = (self.current_quiz_question(), answer) {
            if question.correct_answer == answer {
                self.quiz_score += 1;
            }
        }
        if self.current_quiz_index < self.quiz_questions.len() {
            self.current_quiz_index += 1;
        }
        if self.current_quiz_index < self.quiz_questions.len() {
            QuizProgress::Next(self.current_quiz_index)
        } else {
            QuizProgress::Finished
        }
    }

    pub fn save_code(&mut self, question: usize, language: Language, code: impl Into<String>) {
        self.saved_code.insert((question, language), code.into());
    }

    /// Saved code for a question, or its starter code if nothing was saved.
    pub fn code_for(&self, question: usize, language: Language) -> Option<&str> {
        self.saved_code
            .get(&(question, language))
            .map(String::as_str)
            .or_else(|| {
                self.coding_questions
                    .get(question)
                    .map(|q| q.starter_code.as_str())
            })
    }

    pub fn is_submitted(&self, question: usize) -> bool {
        self.submitted.contains(&question)
    }

    /// Mark a coding question as submitted. A full pass scores once per
    /// question; resubmitting never changes the score. Returns whether the
    /// score went up.
    pub fn record_submission(&mut self, question: usize, result: &EvaluationResult) -> bool {
        if !self.submitted.insert(question) {
            return false;
        }
        if result.all_passed() {
            self.coding_score += 1;
            true
        } else {
            false
        }
    }

    /// Whether every coding question has been submitted.
    pub fn coding_complete(&self) -> bool {
        !self.coding_questions.is_empty()
            && (0..self.coding_questions.len()).all(|i| self.submitted.contains(&i))
    }

    /// Combined score in percent.
    pub fn total_percentage(&self) -> f64 {
        let coding = f64::from(self.coding_score);
        if self.coding_only {
            coding * 100.0
        } else {
            let quiz = f64::from(self.quiz_score) / QUIZ_QUESTION_COUNT as f64;
            (quiz + coding) / 2.0 * 100.0
        }
    }

    /// Clear all progress and start a new session with the same settings.
    pub fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.domain), self.coding_only);
    }
}
