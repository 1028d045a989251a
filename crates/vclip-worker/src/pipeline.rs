//! The per-video pipeline DAG: steps 3-12 of the Job Worker orchestrator.
//! Lock acquisition, heartbeat, and release are the caller's
//! responsibility ([`crate::executor::JobExecutor`]); this module assumes
//! exclusivity for `video_id` already holds.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use vclip_db::{AssetRepository, VideoRepository};
use vclip_enrich::{ContentEnricher, VideoIndexContext};
use vclip_media::{
    chunk_segments, emit_vtt, extract_audio_for_transcription, extract_poster, parse_vtt,
    probe_video, transcode_rung, Rung as MediaRung, Transcriber,
};
use vclip_models::ids::VideoId;
use vclip_models::queue::{reasons, JobEnvelope, QueueKind};
use vclip_models::video::{AssetKind, AssetLabel, Video, VideoAsset, VideoStatus};
use vclip_queue::JobQueue;
use vclip_search::{SearchClient, TranscriptChunkDoc, VideoDoc};
use vclip_storage::{content_type_for_key, Keys, R2Client, Rung as StorageRung};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

const RUNGS: [(MediaRung, StorageRung); 2] =
    [(MediaRung::P720, StorageRung::P720), (MediaRung::P480, StorageRung::P480)];

pub struct Pipeline {
    pub videos: VideoRepository,
    pub assets: AssetRepository,
    pub storage: R2Client,
    pub queue: JobQueue,
    pub search: Option<SearchClient>,
    pub enricher: Option<ContentEnricher>,
    pub transcriber: Box<dyn Transcriber>,
    pub config: WorkerConfig,
}

impl Pipeline {
    /// Run the full DAG for one video. Every intermediate object key is a
    /// deterministic function of `video_id` and label, so re-entry after a
    /// retry picks up exactly where the previous attempt left off.
    pub async fn process(&self, video_id: VideoId) -> WorkerResult<()> {
        let job_dir = PathBuf::from(&self.config.work_dir).join(video_id.to_string());
        tokio::fs::create_dir_all(&job_dir).await.map_err(vclip_media::MediaError::Io)?;
        let result = self.process_in(video_id, &job_dir).await;
        let _ = tokio::fs::remove_dir_all(&job_dir).await;
        result
    }

    async fn process_in(&self, video_id: VideoId, job_dir: &Path) -> WorkerResult<()> {
        let mut video = self.videos.get(video_id).await?;
        if video.status == VideoStatus::Uploaded {
            self.videos.mark_processing(video_id).await?;
        }

        let raw_path = self.download_raw(&video, job_dir).await?;

        let info = probe_video(&raw_path, self.config.probe_timeout_secs).await?;
        self.videos
            .record_probe(video_id, info.duration, video.content_type.as_deref(), &info.raw)
            .await?;
        self.index_metadata_best_effort(&video).await;

        for (media_rung, storage_rung) in RUNGS {
            self.ensure_rung(video_id, &raw_path, job_dir, media_rung, storage_rung, info.gop())
                .await?;
        }

        self.ensure_poster(video_id, &raw_path, job_dir, info.poster_timestamp()).await?;

        let chunk_texts = self.ensure_captions(video_id, &raw_path, job_dir).await?;

        if let Some(enricher) = &self.enricher {
            self.run_enrichment(enricher, &mut video, &chunk_texts).await;
        }

        self.upsert_assets(video_id).await?;
        self.finalize_ready(video_id).await?;

        Ok(())
    }

    async fn download_raw(&self, video: &Video, job_dir: &Path) -> WorkerResult<PathBuf> {
        let ext = Path::new(&video.storage_key_raw)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4");
        let path = job_dir.join(format!("raw.{ext}"));
        self.storage.download_file(&video.storage_key_raw, &path).await?;
        Ok(path)
    }

    async fn index_metadata_best_effort(&self, video: &Video) {
        let Some(search) = &self.search else { return };
        let doc = VideoDoc {
            id: video.id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            content_type: video.content_type.clone(),
            language: video.language.clone(),
            user_id: video.user_id.to_string(),
            status: video.status.as_str().to_string(),
            duration_seconds: video.duration_seconds,
            created_at: video.created_at,
            updated_at: video.updated_at,
            embedding: Vec::new(),
            topics: Vec::new(),
            entities: Vec::new(),
            tags: Vec::new(),
        };
        if let Err(err) = search.index_video(&doc).await {
            warn!(video_id = %video.id, error = %err, "metadata index write failed, continuing");
        }
    }

    async fn ensure_rung(
        &self,
        video_id: VideoId,
        raw_path: &Path,
        job_dir: &Path,
        media_rung: MediaRung,
        storage_rung: StorageRung,
        gop: u32,
    ) -> WorkerResult<()> {
        let playlist_key = Keys::hls_playlist(&video_id.to_string(), storage_rung);
        if self.storage.exists(&playlist_key).await? {
            debug!(video_id = %video_id, rung = media_rung.label(), "rung already present, skipping");
            return Ok(());
        }

        let timeout = match media_rung {
            MediaRung::P720 => self.config.rung_720p_timeout_secs,
            MediaRung::P480 => self.config.rung_480p_timeout_secs,
        };
        let out_dir = job_dir.join(media_rung.label());
        transcode_rung(raw_path, &out_dir, media_rung, gop, timeout).await?;

        let prefix = Keys::hls_prefix(&video_id.to_string(), storage_rung);
        self.storage.upload_directory(&out_dir, &prefix).await?;
        info!(video_id = %video_id, rung = media_rung.label(), "uploaded hls rung");
        Ok(())
    }

    async fn ensure_poster(
        &self,
        video_id: VideoId,
        raw_path: &Path,
        job_dir: &Path,
        timestamp_secs: f64,
    ) -> WorkerResult<()> {
        let key = Keys::poster(&video_id.to_string());
        if self.storage.exists(&key).await? {
            return Ok(());
        }
        let out = job_dir.join("poster.jpg");
        extract_poster(raw_path, &out, timestamp_secs, self.config.poster_timeout_secs).await?;
        self.storage.upload_file(&out, &key, content_type_for_key(&key)).await?;
        Ok(())
    }

    /// Returns the transcript chunk texts, for use by the Content Enricher
    /// step, whether freshly transcribed or recovered from an existing
    /// caption object.
    async fn ensure_captions(
        &self,
        video_id: VideoId,
        raw_path: &Path,
        job_dir: &Path,
    ) -> WorkerResult<Vec<String>> {
        let key = Keys::caption(&video_id.to_string(), &self.config.caption_language);

        if self.storage.exists(&key).await? {
            let bytes = self.storage.download_bytes(&key).await?;
            let content = String::from_utf8_lossy(&bytes).to_string();
            let segments = parse_vtt(&content, Some(&self.config.caption_language));
            let chunks = chunk_segments(&segments);
            self.index_chunks_best_effort(video_id, &chunks).await;
            return Ok(chunks.into_iter().map(|c| c.text).collect());
        }

        if !self.config.transcription_enabled {
            return Ok(Vec::new());
        }

        let wav_path = job_dir.join("audio.wav");
        extract_audio_for_transcription(raw_path, &wav_path, self.config.transcribe_timeout_secs)
            .await?;
        let segments = self.transcriber.transcribe(&wav_path).await?;
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(lang) = segments.iter().find_map(|s| s.lang.clone()) {
            self.videos.record_language(video_id, Some(&lang)).await?;
        }

        let vtt = emit_vtt(&segments);
        self.storage.upload_bytes(vtt.into_bytes(), &key, content_type_for_key(&key)).await?;

        let chunks = chunk_segments(&segments);
        self.index_chunks_best_effort(video_id, &chunks).await;
        Ok(chunks.into_iter().map(|c| c.text).collect())
    }

    async fn index_chunks_best_effort(
        &self,
        video_id: VideoId,
        chunks: &[vclip_media::TranscriptChunk],
    ) {
        let Some(search) = &self.search else { return };
        let docs: Vec<TranscriptChunkDoc> = chunks
            .iter()
            .map(|c| TranscriptChunkDoc {
                video_id: video_id.to_string(),
                text: c.text.clone(),
                start_seconds: c.start_seconds,
                end_seconds: c.end_seconds,
                lang: c.lang.clone(),
                created_at: chrono::Utc::now(),
            })
            .collect();
        if let Err(err) = search.index_transcript_chunks(&video_id.to_string(), &docs).await {
            warn!(video_id = %video_id, error = %err, "transcript chunk index write failed, continuing");
        }
    }

    async fn run_enrichment(
        &self,
        enricher: &ContentEnricher,
        video: &mut Video,
        chunk_texts: &[String],
    ) {
        let ctx = VideoIndexContext {
            video_id: video.id.to_string(),
            user_id: video.user_id.to_string(),
            status: video.status.as_str().to_string(),
            duration_seconds: video.duration_seconds,
            created_at: video.created_at,
            updated_at: video.updated_at,
        };
        match enricher.enrich(&video.title, &video.description, chunk_texts, ctx).await {
            Ok(outcome) => {
                if let Some(lang) = outcome.language {
                    if let Err(err) = self.videos.record_language(video.id, Some(&lang)).await {
                        warn!(video_id = %video.id, error = %err, "failed to persist enrichment language");
                    } else {
                        video.language = Some(lang);
                    }
                }
            }
            Err(err) => {
                warn!(video_id = %video.id, error = %err, "content enrichment failed, continuing");
            }
        }
    }

    async fn upsert_assets(&self, video_id: VideoId) -> WorkerResult<()> {
        let id_str = video_id.to_string();
        let entries = [
            (AssetKind::Hls, AssetLabel::Rung720p, Keys::hls_playlist(&id_str, StorageRung::P720)),
            (AssetKind::Hls, AssetLabel::Rung480p, Keys::hls_playlist(&id_str, StorageRung::P480)),
            (AssetKind::Thumbnail, AssetLabel::Poster, Keys::poster(&id_str)),
        ];
        for (kind, label, key) in entries {
            self.assets.upsert(&VideoAsset::new(video_id, kind, label, key)).await?;
        }
        Ok(())
    }

    /// Re-stat the three required objects; object-store truth is
    /// authoritative over any in-memory bookkeeping at this point.
    async fn finalize_ready(&self, video_id: VideoId) -> WorkerResult<()> {
        let id_str = video_id.to_string();
        let all_present = self.storage.exists(&Keys::hls_playlist(&id_str, StorageRung::P720)).await?
            && self.storage.exists(&Keys::hls_playlist(&id_str, StorageRung::P480)).await?
            && self.storage.exists(&Keys::poster(&id_str)).await?;

        if !all_present {
            warn!(video_id = %video_id, "required artifacts missing at finalize, leaving status unchanged");
            return Ok(());
        }

        let should_notify = self.videos.mark_ready(video_id).await?;
        if should_notify {
            let envelope = JobEnvelope::new(video_id, reasons::VIDEO_READY);
            self.queue.push(QueueKind::Email, &envelope).await?;
        }
        Ok(())
    }
}
