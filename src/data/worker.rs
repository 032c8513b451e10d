use crate::data::{FetchError, PriceSource, TimeSeries};
use crate::ui::Timeframe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct FetchReport {
    pub timeframe: Timeframe,
    pub result: Result<TimeSeries, FetchError>,
}

/// Runs fetches off the interaction loop. Requests are served one at a time in
/// arrival order; the task ends once either side of the channel pair is dropped.
pub fn spawn_fetch_worker<S>(
    source: S,
) -> (
    mpsc::UnboundedSender<Timeframe>,
    mpsc::Receiver<FetchReport>,
    JoinHandle<()>,
)
where
    S: PriceSource + Send + Sync + 'static,
{
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Timeframe>();
    let (report_tx, report_rx) = mpsc::channel(16);

    let handle = tokio::spawn(async move {
        while let Some(timeframe) = request_rx.recv().await {
            debug!(timeframe = timeframe.label(), "worker picked up request");
            let result = source.fetch(timeframe.lookback()).await;
            if report_tx.send(FetchReport { timeframe, result }).await.is_err() {
                return;
            }
        }
    });

    (request_tx, report_rx, handle)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::series::tests::series;
    use crate::data::Lookback;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// Records every lookback it is asked for and answers with a fixed series.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSource {
        pub calls: Arc<Mutex<Vec<Lookback>>>,
        pub fail: bool,
    }

    impl PriceSource for RecordingSource {
        fn fetch(
            &self,
            lookback: Lookback,
        ) -> impl Future<Output = Result<TimeSeries, FetchError>> + Send {
            self.calls.lock().unwrap().push(lookback);
            let result = if self.fail {
                Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(series(10))
            };
            async move { result }
        }
    }

    #[tokio::test]
    async fn answers_each_request_in_order() {
        let source = RecordingSource::default();
        let calls = source.calls.clone();
        let (requests, mut reports, _handle) = spawn_fetch_worker(source);

        requests.send(Timeframe::OneWeek).unwrap();
        requests.send(Timeframe::AllTime).unwrap();

        let first = reports.recv().await.unwrap();
        assert_eq!(first.timeframe, Timeframe::OneWeek);
        assert_eq!(first.result.unwrap().len(), 10);
        let second = reports.recv().await.unwrap();
        assert_eq!(second.timeframe, Timeframe::AllTime);

        assert_eq!(*calls.lock().unwrap(), vec![Lookback::Days(7), Lookback::Max]);
    }

    #[tokio::test]
    async fn failures_come_back_as_reports() {
        let source = RecordingSource {
            fail: true,
            ..Default::default()
        };
        let (requests, mut reports, _handle) = spawn_fetch_worker(source);

        requests.send(Timeframe::OneDay).unwrap();
        let report = reports.recv().await.unwrap();
        assert!(matches!(report.result, Err(FetchError::Status(_))));
    }

    #[tokio::test]
    async fn stops_when_requests_close() {
        let (requests, _reports, handle) = spawn_fetch_worker(RecordingSource::default());
        drop(requests);
        handle.await.unwrap();
    }
}
