use bytes::Bytes;
use chrono::Utc;
use clipvault_core::MediaRecord;
use futures::stream::{self, Stream};
use std::task::Poll;
use uuid::Uuid;

/// Stand-in for an MP4 upload; the fake remuxer only copies bytes.
pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42mdat-payload-moov-index";

pub fn video_record(owner: Uuid, locator: Option<&str>) -> MediaRecord {
    let now = Utc::now();
    MediaRecord {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Holiday clip".to_string(),
        description: Some("Beach at sunset".to_string()),
        video_url: locator.map(String::from),
        created_at: now,
        updated_at: now,
    }
}

/// Upload body delivered in a few chunks.
pub fn chunked_body(bytes: &'static [u8]) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    stream::iter(
        bytes
            .chunks(7)
            .map(|chunk| Ok(Bytes::from_static(chunk)))
            .collect::<Vec<_>>(),
    )
}

/// Body that fails the test if anything reads it.
pub fn untouchable_body() -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    stream::poll_fn(|_| -> Poll<Option<Result<Bytes, std::io::Error>>> {
        panic!("upload body must not be read")
    })
}
