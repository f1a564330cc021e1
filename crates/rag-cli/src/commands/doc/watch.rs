use rag_session::ProjectPage;

use crate::context::{Auth, Backend};
use crate::progress::Progress;

/// Block until every document on the page is completed or failed. Ctrl-C
/// closes the page, which stops its poll loop.
pub async fn until_settled(page: &ProjectPage<Backend, Auth>) -> anyhow::Result<()> {
    if !page.is_polling() {
        return Ok(());
    }

    let progress = Progress::spinner("Waiting for documents to finish processing");
    tokio::select! {
        settled = page.wait_until_settled() => {
            settled?;
            progress.finish_ok("Processing finished");
            Ok(())
        }
        interrupted = tokio::signal::ctrl_c() => {
            interrupted?;
            page.close();
            progress.finish_err("Interrupted");
            anyhow::bail!("interrupted before processing finished")
        }
    }
}
