//! Prompt submission against the inference server.
//!
//! [`GenerationGateway::generate`] always hands back a
//! [`GenerationResult`]; failures are folded into its `Failure`
//! variant at this boundary. [`GenerationGateway::generate_stream`]
//! exposes the server's incremental mode as a lazy stream of text
//! fragments that ends at the server's completion marker.

use std::pin::Pin;
use futures_util::stream::{self, Stream, StreamExt};
use log::{debug, trace, error};
use serde_json::Value;

use crate::config::ChatbotConfig;
use crate::error::{Error, ErrorKind};
use crate::prompt::wrap_prompt;
use crate::providers::ollama::{scoped_client, GenerateBody, StreamChunk};
use crate::request::{GenerationRequest, GenerationResult};

/// Text fragments of one streamed generation
pub type FragmentStream
  = Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>;

#[derive(Debug, Clone)]
pub struct GenerationGateway
{   config: ChatbotConfig
}

impl GenerationGateway
{   pub fn new(config: ChatbotConfig) -> Self
    {   debug!("Creating GenerationGateway for {}", config.endpoint.base_url);
        GenerationGateway { config }
    }

    /// Submit one prompt and wait for the complete answer.
    /// Never retries; the configured ceiling bounds the wait.
    pub async fn generate(
      &self
    , request: GenerationRequest
    ) -> GenerationResult
    {   debug!("Handling generate for: {}", request.model_name);
        let ceiling = self.config.timeout();

        match tokio::time::timeout(ceiling, self.exchange(&request)).await
        {   Ok(result) => {
              if let Err(e) = &result
              {   error!("Generation failed: {}", e);
              }
              result.into()
            }
          , Err(_) => {
              error!("Request timed out after {:?}", ceiling);
              Error::timeout().into()
            }
        }
    }

    /// Submit one prompt in streaming mode.
    ///
    /// Status failures surface here as `Err`; failures after the first
    /// byte arrive as the stream's final item.
    pub async fn generate_stream(
      &self
    , request: GenerationRequest
    ) -> Result<FragmentStream, Error>
    {   debug!("Handling generate_stream for: {}", request.model_name);
        let ceiling = self.config.timeout();

        let response = tokio::time::timeout(
            ceiling,
            self.send(&request.with_stream(true))
          )
          .await
          .map_err(|_| {
            error!("Request timed out after {:?}", ceiling);
            Error::timeout()
          })??;

        Ok(Box::pin(fragments(response.bytes_stream())))
    }

    async fn exchange(
      &self
    , request: &GenerationRequest
    ) -> Result<Value, Error>
    {   let response = self.send(request).await?;

        if request.stream
        {   let body = response.text().await?;
            trace!("Streamed body: {}", body);
            return fold_stream_body(&body);
        }

        let raw: Value = response.json().await?;
        trace!("Generate response: {}", raw);
        Ok(raw)
    }

    /// POST the wrapped prompt; anything but 200 is a `ServerError`
    async fn send(
      &self
    , request: &GenerationRequest
    ) -> Result<reqwest::Response, Error>
    {   let client = scoped_client(&self.config)?;
        let body = GenerateBody::new(
          request,
          wrap_prompt(&request.prompt),
          &self.config
        );
        trace!("Generate request: {:?}", body);

        let response = client
          .post(self.config.endpoint.generate_url())
          .json(&body)
          .send()
          .await?;

        let status = response.status();
        trace!("Generate response status: {}", status);

        if status != reqwest::StatusCode::OK
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Server error {}: {}", status, error_text);
            return Err(Error::server(status.as_u16(), &error_text));
        }

        Ok(response)
    }
}

/// Collapse a newline-delimited body into its final chunk, with
/// `response` holding the concatenation of every fragment.
/// The final chunk must carry `"done": true`
fn fold_stream_body(body: &str) -> Result<Value, Error>
{   let mut text = String::new();
    let mut last: Option<Value> = None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty())
    {   let value: Value = serde_json::from_str(line)
          .map_err(|e| Error::http(format!("Invalid stream chunk: {}", e)))?;
        if let Some(msg) = value.get("error").and_then(Value::as_str)
        {   return Err(Error::new(ErrorKind::ServerError, msg));
        }
        if let Some(fragment) = value.get("response").and_then(Value::as_str)
        {   text.push_str(fragment);
        }
        last = Some(value);
    }

    let mut last = last
      .ok_or_else(|| Error::http("Empty stream body"))?;
    if last.get("done").and_then(Value::as_bool) != Some(true)
    {   error!("Stream ended before completion marker");
        return Err(Error::http("Stream ended before completion marker"));
    }
    if let Some(obj) = last.as_object_mut()
    {   obj.insert("response".to_string(), Value::String(text));
    }
    Ok(last)
}

struct FragmentState<S>
{   bytes: Pin<Box<S>>
  , buffer: Vec<u8>
  , pending: Option<Error>
  , finished: bool
}

fn fragments<S, B>(bytes: S)
  -> impl Stream<Item = Result<String, Error>> + Send
where
  S: Stream<Item = reqwest::Result<B>> + Send + 'static
, B: AsRef<[u8]> + Send + 'static
{   let state = FragmentState
    {   bytes: Box::pin(bytes)
      , buffer: Vec::new()
      , pending: None
      , finished: false
    };
    stream::unfold(state, next_fragment::<S, B>)
}

async fn next_fragment<S, B>(
  mut state: FragmentState<S>
) -> Option<(Result<String, Error>, FragmentState<S>)>
where
  S: Stream<Item = reqwest::Result<B>> + Send
, B: AsRef<[u8]> + Send
{   while !state.finished
    {   if let Some(e) = state.pending.take()
        {   state.finished = true;
            return Some((Err(e), state));
        }

        if let Some(pos) = state.buffer.iter().position(|b| *b == b'\n')
        {   let line: Vec<u8> = state.buffer.drain(..=pos).collect();
            match parse_line(&line)
            {   Ok(None) => continue
              , Ok(Some(chunk)) => {
                  state.finished = chunk.done;
                  if chunk.response.is_empty()
                  {   continue;
                  }
                  return Some((Ok(chunk.response), state));
                }
              , Err(e) => {
                  state.finished = true;
                  return Some((Err(e), state));
                }
            }
        }

        match state.bytes.next().await
        {   Some(Ok(bytes)) => {
              state.buffer.extend_from_slice(bytes.as_ref());
            }
          , Some(Err(e)) => {
              state.finished = true;
              return Some((Err(e.into()), state));
            }
          , None => {
              let rest = std::mem::take(&mut state.buffer);
              return match parse_line(&rest)
              {   Ok(Some(chunk)) if chunk.done => {
                    state.finished = true;
                    if chunk.response.is_empty()
                    {   None
                    } else
                    {   Some((Ok(chunk.response), state))
                    }
                  }
                , Ok(chunk) => {
                    error!("Stream ended before completion marker");
                    let truncated
                      = Error::http("Stream ended before completion marker");
                    match chunk.filter(|c| !c.response.is_empty())
                    {   Some(c) => {
                          state.pending = Some(truncated);
                          Some((Ok(c.response), state))
                        }
                      , None => {
                          state.finished = true;
                          Some((Err(truncated), state))
                        }
                    }
                  }
                , Err(e) => {
                    state.finished = true;
                    Some((Err(e), state))
                  }
              };
            }
        }
    }
    None
}

fn parse_line(line: &[u8]) -> Result<Option<StreamChunk>, Error>
{   let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty()
    {   return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(text)
      .map_err(|e| {
        error!("Invalid stream chunk: {}", e);
        Error::http(format!("Invalid stream chunk: {}", e))
      })?;

    if let Some(msg) = &chunk.error
    {   error!("Server reported: {}", msg);
        return Err(Error::new(ErrorKind::ServerError, msg.clone()));
    }
    Ok(Some(chunk))
}
