use teloxide::utils::html;

use super::poller::ProgressScreen;
use crate::utils::progress_bar;

pub const DOWNLOAD_BUTTON: &str = "⬇️ Скачать";

/// HTML text of a progress screen for the task titled `title`.
pub fn render(screen: &ProgressScreen, title: &str) -> String {
    let title = html::escape(title);
    match screen {
        ProgressScreen::Starting => in_progress(&title, 0.0, "Инициализация..."),
        ProgressScreen::Running { progress, status } => {
            in_progress(&title, *progress, &html::escape(status.label()))
        }
        ProgressScreen::Completed { download_url } => {
            let link_line = if download_url.is_some() {
                "🔗 Ссылка для скачивания:\n\n⚠️ Ссылка действительна в течение ограниченного времени."
            } else {
                "❗️ Сервис не вернул ссылку для скачивания."
            };
            format!(
                "<b>✅ Загрузка завершена!</b>\n\n🎬 Название: {}\n\n{}",
                title, link_line
            )
        }
        ProgressScreen::Failed { details } => format!(
            "<b>❌ Ошибка при скачивании!</b>\n\n🎬 Название: {}\n❗️ Детали: {}",
            title,
            html::escape(details)
        ),
        ProgressScreen::TimedOut => format!(
            "<b>⚠️ Превышено время ожидания!</b>\n\n🎬 Название: {}\n❗️ Пожалуйста, попробуйте позже.",
            title
        ),
        ProgressScreen::TrackingFailed { details } => format!(
            "<b>❌ Ошибка при отслеживании прогресса!</b>\n\n🎬 Название: {}\n❗️ Детали: {}\n💡 Попробуйте повторить запрос позже.",
            title,
            html::escape(details)
        ),
    }
}

fn in_progress(title: &str, progress: f64, status: &str) -> String {
    format!(
        "<b>🟩 Загрузка видео...</b>\n\n🎬 Название: {}\n⏳ Прогресс: {} {:.1}%\n📂 Статус: {}\n💡 Пожалуйста, подождите.",
        title,
        progress_bar(progress),
        progress,
        status
    )
}
