use crate::{stmt::Value, Result};

use std::{
    collections::VecDeque,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

/// A single result row, one value per selected column.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Row {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Row {
        Row { values }
    }
}

/// Rows returned by a query, either buffered or streamed from the driver.
#[derive(Default)]
pub struct Rows {
    buffer: VecDeque<Row>,
    stream: Option<DynStream>,
}

type DynStream = Pin<Box<dyn Stream<Item = Result<Row>> + Send + 'static>>;

impl Rows {
    pub fn from_vec(rows: Vec<Row>) -> Rows {
        Rows {
            buffer: rows.into(),
            stream: None,
        }
    }

    pub fn from_stream<T: Stream<Item = Result<Row>> + Send + 'static>(stream: T) -> Rows {
        Rows {
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    /// Returns the next row
    pub async fn next(&mut self) -> Option<Result<Row>> {
        StreamExt::next(self).await
    }

    pub async fn collect(mut self) -> Result<Vec<Row>> {
        let mut ret = Vec::with_capacity(self.buffer.len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }
}

impl Stream for Rows {
    type Item = Result<Row>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(row) = self.buffer.pop_front() {
            return Poll::Ready(Some(Ok(row)));
        }

        match &mut self.stream {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.buffer.len();
        match &self.stream {
            Some(stream) => {
                let (low, high) = stream.size_hint();
                (buffered + low, high.map(|high| buffered + high))
            }
            None => (buffered, Some(buffered)),
        }
    }
}

impl fmt::Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("buffer", &self.buffer)
            .field("stream", &self.stream.as_ref().map(|_| ".."))
            .finish()
    }
}
