use clap::{Args, Subcommand, ValueEnum};
use rag_core::enums::FeedbackRating;

/// Chat commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChatCommands {
    /// Create a chat in a project.
    Create(ChatCreateArgs),
    /// Delete a chat.
    Delete(ChatRef),
    /// Show a chat and its message history.
    Show(ChatRef),
    /// Ask a question and print the answer.
    Send(ChatSendArgs),
    /// Rate an assistant message.
    Feedback(ChatFeedbackArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ChatRef {
    /// Project ID.
    pub project_id: String,
    /// Chat ID.
    pub chat_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ChatCreateArgs {
    /// Project ID.
    pub project_id: String,
    /// Chat title (generated when omitted).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ChatSendArgs {
    #[command(flatten)]
    pub chat: ChatRef,
    /// Message text.
    pub content: String,
}

#[derive(Clone, Debug, Args)]
pub struct ChatFeedbackArgs {
    #[command(flatten)]
    pub chat: ChatRef,
    /// Assistant message ID.
    pub message_id: String,
    #[arg(long, value_enum)]
    pub rating: RatingArg,
    /// Free-text comment.
    #[arg(long)]
    pub comment: Option<String>,
    /// Feedback category, e.g. "inaccurate".
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RatingArg {
    Like,
    Dislike,
}

impl From<RatingArg> for FeedbackRating {
    fn from(value: RatingArg) -> Self {
        match value {
            RatingArg::Like => Self::Like,
            RatingArg::Dislike => Self::Dislike,
        }
    }
}
