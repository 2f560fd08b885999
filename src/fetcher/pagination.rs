//! Time-windowed kline pagination
//!
//! Each page request starts at the current window start and asks for up to the
//! page cap. The next window starts 1 ms after the last open time received.
//! Pages are strictly sequential since each start depends on the previous page.
//!
//! Pagination stops when:
//! - a page returns fewer candles than the cap (including an empty page)
//! - the window start passes the inclusive end time
//! - the safety iteration bound is reached (reported as an error)

use crate::fetcher::{FetcherError, FetcherResult, PageObserver};
use crate::Candle;
use std::future::Future;
use tracing::{debug, warn};

/// Maximum number of page requests for one fetch
pub const MAX_ITERATIONS: usize = 10_000;

/// Pagination helper for kline requests
pub struct PaginationHelper;

impl PaginationHelper {
    /// Collect every candle in `[start_time, end_time]`
    ///
    /// # Arguments
    /// * `symbol` - Trading symbol, used in log and error messages
    /// * `start_time` - Inclusive start (Unix ms)
    /// * `end_time` - Inclusive end (Unix ms)
    /// * `page_limit` - Provider cap per request
    /// * `observer` - Notified once per non-empty page
    /// * `fetch_page` - Fetches one page beginning at the given window start
    ///
    /// # Returns
    /// Ascending candles with duplicate open times removed (first occurrence kept)
    pub async fn paginate_klines<F, Fut>(
        symbol: &str,
        start_time: i64,
        end_time: i64,
        page_limit: usize,
        observer: &dyn PageObserver,
        mut fetch_page: F,
    ) -> FetcherResult<Vec<Candle>>
    where
        F: FnMut(i64) -> Fut,
        Fut: Future<Output = FetcherResult<Vec<Candle>>>,
    {
        let mut all_candles: Vec<Candle> = Vec::new();
        let mut current_start = start_time;
        let mut iteration = 0;

        loop {
            if current_start > end_time {
                debug!("Window start passed end_time. Total candles: {}", all_candles.len());
                break;
            }

            if iteration >= MAX_ITERATIONS {
                return Err(FetcherError::ApiError(format!(
                    "Max iterations ({MAX_ITERATIONS}) exceeded for symbol {symbol}. Last timestamp: {current_start}"
                )));
            }

            debug!(
                "Fetching klines page {} for {} from {} to {}",
                iteration + 1,
                symbol,
                current_start,
                end_time
            );

            let page = fetch_page(current_start).await?;
            iteration += 1;
            let received = page.len();

            let Some(last_open_time) = page.last().map(|c| c.open_time) else {
                debug!("Empty page at iteration {}", iteration);
                break;
            };

            let before = all_candles.len();
            for candle in page {
                let is_new = all_candles
                    .last()
                    .map_or(true, |last| candle.open_time > last.open_time);
                if is_new {
                    all_candles.push(candle);
                } else {
                    warn!(
                        "Dropping out-of-order or duplicate candle at {} for {}",
                        candle.open_time, symbol
                    );
                }
            }
            let added = all_candles.len() - before;

            debug!("Received {} candles in page {} ({} new)", received, iteration, added);
            observer.page_retrieved(iteration, added, all_candles.len());

            if received < page_limit {
                debug!("Short page ({} < {}), history complete", received, page_limit);
                break;
            }

            let next_start = last_open_time + 1;
            if next_start <= current_start {
                return Err(FetcherError::ApiError(format!(
                    "Pagination for {symbol} did not advance past {current_start}"
                )));
            }
            current_start = next_start;
        }

        debug!(
            "Pagination completed after {} requests. Total candles: {}",
            iteration,
            all_candles.len()
        );

        Ok(all_candles)
    }
}
