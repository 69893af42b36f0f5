//! Browser lifecycle and whole-presentation extraction.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use futures::future::try_join_all;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout_at, Instant};

use crate::config::ExtractorConfig;
use crate::dom::chrome::eval_json;
use crate::dom::DomNode;
use crate::errors::{ExtractError, Result};
use crate::extractor::constants::{
    DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH, SLIDES_READY_POLL_MS, SLIDES_WRAPPER_SELECTOR,
    SLIDE_SELECTOR, SPEAKER_NOTE_ATTRIBUTE, SPEAKER_NOTE_SELECTOR,
};
use crate::extractor::{finalize_slide, walk_slide, Rasterizer};
use crate::models::PresentationAttributes;

/// A launched headless browser with its protocol event loop.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    config: ExtractorConfig,
}

impl BrowserSession {
    /// Launches the browser configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Config` for an unusable browser configuration and
    /// `ExtractError::Browser` if the process fails to start.
    pub async fn launch(config: &ExtractorConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(DEFAULT_SLIDE_WIDTH as u32, DEFAULT_SLIDE_HEIGHT as u32)
            .arg("--force-device-scale-factor=1")
            .arg("--hide-scrollbars")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder
            .build()
            .map_err(|e| ExtractError::Config(format!("Browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {:?}", e);
                }
            }
        });
        info!("Browser launched");

        Ok(BrowserSession {
            browser,
            handler,
            config: config.clone(),
        })
    }

    /// Opens the render-only view of a presentation at slide size and waits for it to load.
    pub async fn open_presentation(&self, presentation_id: &str) -> Result<Page> {
        let url = self.config.presentation_url(presentation_id);
        let budget = self.config.timeout;

        let page = self.browser.new_page("about:blank").await?;
        let viewport = SetDeviceMetricsOverrideParams::builder()
            .width(DEFAULT_SLIDE_WIDTH as i64)
            .height(DEFAULT_SLIDE_HEIGHT as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| ExtractError::Config(format!("Viewport params error: {}", e)))?;
        page.execute(viewport).await?;

        info!("Navigating to {}", url);
        let navigation = async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation().await?;
            Ok::<(), ExtractError>(())
        };
        let deadline = Instant::now() + budget;
        timeout_at(deadline, navigation)
            .await
            .map_err(|_| ExtractError::Timeout(budget.as_secs(), format!("navigating to {}", url)))??;

        // An absent wrapper after the deadline is reported by extraction as SlidesNotFound.
        let page_ref = &page;
        let ready = poll_until(
            move || slides_rendered(page_ref),
            Duration::from_millis(SLIDES_READY_POLL_MS),
        );
        match timeout_at(deadline, ready).await {
            Ok(attempts) => {
                let attempts = attempts?;
                debug!("Slides rendered after {} checks", attempts);
            }
            Err(_) => warn!(
                "Slides not rendered within {} seconds of opening {}",
                budget.as_secs(),
                url
            ),
        }

        Ok(page)
    }

    /// Closes the browser and stops its event loop.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}

/// Calls `probe` every `interval` until it reports ready and returns the number of calls.
/// A probe error ends the wait.
async fn poll_until<F, Fut>(mut probe: F, interval: Duration) -> Result<usize>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        if probe().await? {
            return Ok(attempts);
        }
        sleep(interval).await;
    }
}

/// Whether the slides container exists and holds at least one slide.
async fn slides_rendered(page: &Page) -> Result<bool> {
    let Some(wrapper) = page
        .find_elements(SLIDES_WRAPPER_SELECTOR)
        .await?
        .into_iter()
        .next()
    else {
        return Ok(false);
    };
    Ok(!wrapper.find_elements(SLIDE_SELECTOR).await?.is_empty())
}

/// Rejects an empty presentation id.
pub fn validate_presentation_id(presentation_id: &str) -> Result<&str> {
    let trimmed = presentation_id.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::MissingPresentationId);
    }
    Ok(trimmed)
}

/// Walks every slide concurrently, then rasterizes slide by slide.
///
/// Speaker note `i` is attached to slide `i`; slides beyond the notes get none.
pub async fn extract_slides<N: DomNode>(
    slides: &[N],
    speaker_notes: &[String],
    rasterizer: &Rasterizer,
) -> Result<PresentationAttributes> {
    let walked = try_join_all(slides.iter().map(|slide| walk_slide(slide))).await?;

    let mut results = Vec::with_capacity(walked.len());
    for (index, slide) in walked.into_iter().enumerate() {
        let speaker_note = speaker_notes.get(index).cloned();
        results.push(finalize_slide(slide, rasterizer, speaker_note).await?);
    }

    info!("Extracted {} slides", results.len());
    Ok(PresentationAttributes { slides: results })
}

/// Extracts every slide of a loaded presentation page.
///
/// # Errors
///
/// Returns `ExtractError::SlidesNotFound` if the page has no slides container.
pub async fn extract_presentation(
    page: &Page,
    rasterizer: &Rasterizer,
) -> Result<PresentationAttributes> {
    let wrapper = page
        .find_elements(SLIDES_WRAPPER_SELECTOR)
        .await?
        .into_iter()
        .next()
        .ok_or(ExtractError::SlidesNotFound)?;

    let notes_script = format!(
        "function () {{ return JSON.stringify(Array.from(this.querySelectorAll({:?})).map((el) => el.getAttribute({:?}) || \"\")); }}",
        SPEAKER_NOTE_SELECTOR, SPEAKER_NOTE_ATTRIBUTE
    );
    let speaker_notes: Vec<String> = eval_json(&wrapper, &notes_script).await?;
    let slides = wrapper.find_elements(SLIDE_SELECTOR).await?;
    debug!(
        "Found {} slides and {} speaker notes",
        slides.len(),
        speaker_notes.len()
    );

    extract_slides(&slides, &speaker_notes, rasterizer).await
}

/// Runs a full extraction: launch, navigate, extract, close.
///
/// The page and browser are closed whether or not extraction succeeded.
pub async fn extract_presentation_by_id(
    config: &ExtractorConfig,
    presentation_id: &str,
) -> Result<PresentationAttributes> {
    let presentation_id = validate_presentation_id(presentation_id)?;
    let rasterizer = Rasterizer::new(config.screenshots_dir());
    let session = BrowserSession::launch(config).await?;

    let result = async {
        let page = session.open_presentation(presentation_id).await?;
        let extracted = extract_presentation(&page, &rasterizer).await;
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }
        extracted
    }
    .await;

    if let Err(e) = session.close().await {
        warn!("Failed to close browser: {}", e);
    }
    result
}
