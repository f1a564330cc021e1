use rag_core::entities::{ChatWithMessages, Message};
use rag_core::enums::FeedbackRating;
use rag_session::{ChatPage, FeedbackForm};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ChatCommands, ChatFeedbackArgs, ChatRef, ChatSendArgs};
use crate::context::{AppContext, Auth, Backend};
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct DeletedResponse<'a> {
    deleted: &'a str,
}

#[derive(Serialize)]
struct ExchangeResponse {
    question: Message,
    answer: Message,
}

#[derive(Serialize)]
struct FeedbackResponse<'a> {
    message_id: &'a str,
    rating: FeedbackRating,
    submitted: bool,
}

/// Handle `ragc chat <subcommand>`.
pub async fn handle(
    action: &ChatCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ChatCommands::Create(args) => {
            let page = ctx.project_page(&args.project_id);
            let chat = page.create_chat(args.title.clone()).await?;
            output(&chat, flags.format)
        }
        ChatCommands::Delete(ChatRef {
            project_id,
            chat_id,
        }) => {
            ctx.project_page(project_id).delete_chat(chat_id).await?;
            output(&DeletedResponse { deleted: chat_id }, flags.format)
        }
        ChatCommands::Show(chat) => {
            let page = open(chat, ctx).await?;
            output(&loaded(&page)?, flags.format)
        }
        ChatCommands::Send(args) => send(args, ctx, flags).await,
        ChatCommands::Feedback(args) => feedback(args, ctx, flags).await,
    }
}

async fn open(chat: &ChatRef, ctx: &AppContext) -> anyhow::Result<ChatPage<Backend, Auth>> {
    let page = ctx.chat_page(&chat.project_id, &chat.chat_id);
    page.load().await?;
    Ok(page)
}

fn loaded(page: &ChatPage<Backend, Auth>) -> anyhow::Result<ChatWithMessages> {
    page.snapshot()
        .chat
        .ok_or_else(|| anyhow::anyhow!("chat not loaded"))
}

async fn send(args: &ChatSendArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let page = open(&args.chat, ctx).await?;
    let before = page.snapshot().messages().len();

    let progress = Progress::spinner("Waiting for the answer");
    if let Err(error) = page.send_message(&args.content).await {
        progress.finish_err(page.snapshot().error.as_deref().unwrap_or("Failed"));
        return Err(error.into());
    }
    progress.finish_clear();

    let mut added = loaded(&page)?.messages.split_off(before).into_iter();
    match (added.next(), added.next()) {
        (Some(question), Some(answer)) => {
            output(&ExchangeResponse { question, answer }, flags.format)
        }
        _ => anyhow::bail!("backend returned an incomplete message exchange"),
    }
}

async fn feedback(
    args: &ChatFeedbackArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let page = ctx.chat_page(&args.chat.project_id, &args.chat.chat_id);
    let rating = FeedbackRating::from(args.rating);
    page.open_feedback(&args.message_id, rating);
    page.submit_feedback(FeedbackForm {
        rating,
        comment: args.comment.clone(),
        category: args.category.clone(),
    })
    .await?;
    output(
        &FeedbackResponse {
            message_id: &args.message_id,
            rating,
            submitted: true,
        },
        flags.format,
    )
}
