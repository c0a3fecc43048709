mod bank;
mod ids;
mod options;
mod question;
mod response;
mod submission;

pub use bank::{BankError, QuestionBank};
pub use ids::{ParseIdError, SessionId, SubmissionId};
pub use options::{AnswerOption, display_order};
pub use question::{NumberOrText, Question, QuestionError, QuestionRecord};
pub use response::{MIN_REASONING_CHARS, QuestionResponse, ResponseDraft, ResponseError};
pub use submission::{Submission, SubmissionError};
