//! 翻译协调器核心实现
//!
//! [`TranslationCoordinator`] owns everything a flipbook needs to switch its
//! visible language: the local dictionary, the remote client, both
//! session caches and the stored preference. It is an explicitly constructed
//! value; each page builds one and hands it the document root on every event.
//!
//! ## 状态
//!
//! The coordinator is either `Idle` or `Translating`. A request arriving while
//! another one runs is ignored, never queued. Interior state lives in
//! `Cell`/`RefCell` because the DOM handles are `Rc`s; the coordinator is
//! therefore `!Send` and runs on a current-thread runtime. No `RefCell` borrow
//! is held across an `.await`.
//!
//! ## 翻译流程
//!
//! 1. mark the target language button active and show the progress bar
//! 2. collect the translatable elements
//! 3. serve what the translation cache already knows
//! 4. batch the remaining distinct texts
//! 5. per batch: local dictionary first, remote client for the rest
//! 6. write results back, cache them, advance the progress bar
//! 7. remember the language, hide the progress bar, close the selector

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use markup5ever_rcdom::Handle;

use super::ui::{LanguageSelector, ProgressIndicator};
use crate::translation::{
    config::TranslationConfig,
    dictionary::LocalDictionary,
    error::{TranslationError, TranslationResult},
    language::{LanguageCode, SupportedLanguages},
    pipeline::{BatchManager, PendingText, TextCollector, TextUnit},
    remote::{RemoteTranslationClient, ResolvedText, TextOrigin},
    storage::{CacheStats, FilePreferenceStore, OriginalTextCache, PreferenceStore, TranslationCache},
};

/// 协调器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Translating,
}

/// Why a language change request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another change is still running
    AlreadyTranslating,
    /// The page already shows the requested language
    SameLanguage,
    /// The requested language is not offered
    Unsupported,
    /// The clicked control carries no `data-lang`
    NoLanguage,
    /// Nothing was stored by an earlier session
    NoStoredPreference,
}

/// Outcome of a language change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageChange {
    Ignored(IgnoreReason),
    Completed(TranslationReport),
}

impl LanguageChange {
    pub fn is_completed(&self) -> bool {
        matches!(self, LanguageChange::Completed(_))
    }

    pub fn report(&self) -> Option<&TranslationReport> {
        match self {
            LanguageChange::Completed(report) => Some(report),
            LanguageChange::Ignored(_) => None,
        }
    }
}

/// 单次翻译统计
///
/// Unit counters add up to `units`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationReport {
    pub source: LanguageCode,
    pub target: LanguageCode,
    /// Elements collected from the page
    pub units: usize,
    /// Distinct texts that needed work beyond the cache
    pub distinct_texts: usize,
    pub batches: usize,
    pub from_cache: usize,
    pub from_dictionary: usize,
    pub from_remote: usize,
    pub from_fallback: usize,
    pub unchanged: usize,
    pub elapsed: Duration,
}

impl TranslationReport {
    fn new(source: &LanguageCode, target: &LanguageCode) -> Self {
        Self {
            source: source.clone(),
            target: target.clone(),
            units: 0,
            distinct_texts: 0,
            batches: 0,
            from_cache: 0,
            from_dictionary: 0,
            from_remote: 0,
            from_fallback: 0,
            unchanged: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn count(&mut self, origin: &TextOrigin, units: usize) {
        match origin {
            TextOrigin::Cache => self.from_cache += units,
            TextOrigin::Dictionary => self.from_dictionary += units,
            TextOrigin::Remote { .. } => self.from_remote += units,
            TextOrigin::EmbeddedFallback => self.from_fallback += units,
            TextOrigin::Unchanged => self.unchanged += units,
        }
    }
}

/// Puts the coordinator back to `Idle` however the change ends
struct TranslatingGuard<'a> {
    state: &'a Cell<CoordinatorState>,
}

impl<'a> TranslatingGuard<'a> {
    fn enter(state: &'a Cell<CoordinatorState>) -> Self {
        state.set(CoordinatorState::Translating);
        Self { state }
    }
}

impl Drop for TranslatingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(CoordinatorState::Idle);
    }
}

/// 翻译协调器
pub struct TranslationCoordinator {
    languages: SupportedLanguages,
    dictionary: Arc<LocalDictionary>,
    client: RemoteTranslationClient,
    preferences: Box<dyn PreferenceStore>,
    collector: TextCollector,
    batch_manager: BatchManager,
    settle_delay: Duration,

    current_language: RefCell<LanguageCode>,
    state: Cell<CoordinatorState>,
    originals: RefCell<OriginalTextCache>,
    translations: RefCell<TranslationCache>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for TranslationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCoordinator")
            .field("current_language", &self.current_language.borrow())
            .field("state", &self.state.get())
            .field("client", &self.client)
            .finish()
    }
}

impl TranslationCoordinator {
    /// 创建协调器
    ///
    /// The configuration is validated first; the page starts out in its
    /// default language.
    pub fn new(
        config: &TranslationConfig,
        dictionary: Arc<LocalDictionary>,
        client: RemoteTranslationClient,
        preferences: Box<dyn PreferenceStore>,
    ) -> TranslationResult<Self> {
        config.validate()?;

        Ok(Self {
            languages: config.languages()?,
            dictionary,
            client,
            preferences,
            collector: TextCollector::new(),
            batch_manager: BatchManager::new(config.batch_size),
            settle_delay: config.settle_delay(),
            current_language: RefCell::new(config.default_language()),
            state: Cell::new(CoordinatorState::Idle),
            originals: RefCell::new(OriginalTextCache::new()),
            translations: RefCell::new(TranslationCache::new()),
            next_id: Cell::new(1),
        })
    }

    /// Loads the dictionary, builds HTTP endpoints and a file preference
    /// store from `config`
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        let dictionary = Arc::new(LocalDictionary::load(&config.dictionary_paths()));
        let client = RemoteTranslationClient::from_config(config)?;
        let preferences = Box::new(FilePreferenceStore::new(config.preferences_path()));

        Self::new(config, dictionary, client, preferences)
    }

    pub fn state(&self) -> CoordinatorState {
        self.state.get()
    }

    pub fn current_language(&self) -> LanguageCode {
        self.current_language.borrow().clone()
    }

    pub fn supported_languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    /// Declares which language the page currently shows
    pub fn set_current_language(&self, language: &str) -> TranslationResult<()> {
        if self.state.get() == CoordinatorState::Translating {
            return Err(TranslationError::ConfigError(
                "cannot change the page language while translating".to_string(),
            ));
        }

        let language = self
            .languages
            .resolve(language)
            .ok_or_else(|| TranslationError::UnsupportedLanguage(language.to_string()))?;
        *self.current_language.borrow_mut() = language;
        Ok(())
    }

    /// 切换页面语言
    ///
    /// Translates every translatable element below `root` into `target`. The
    /// request is ignored while another change runs, when `target` is the
    /// current language, or when `target` is not supported. Nothing in here
    /// fails outward: at worst some elements keep their previous text and get
    /// the `translation-failed` class.
    pub async fn change_language(&self, root: &Handle, target: &str) -> LanguageChange {
        if self.state.get() == CoordinatorState::Translating {
            tracing::debug!("Ignoring switch to {}: a translation is running", target);
            return LanguageChange::Ignored(IgnoreReason::AlreadyTranslating);
        }

        let source = self.current_language();
        if LanguageCode::new(target) == source {
            tracing::debug!("Ignoring switch to {}: already current", target);
            return LanguageChange::Ignored(IgnoreReason::SameLanguage);
        }

        let Some(target) = self.languages.resolve(target) else {
            TranslationError::UnsupportedLanguage(target.to_string()).log();
            return LanguageChange::Ignored(IgnoreReason::Unsupported);
        };

        let _guard = TranslatingGuard::enter(&self.state);
        let started = Instant::now();
        tracing::info!("Switching page language {} -> {}", source, target);

        let selector = LanguageSelector::find(root);
        let progress = ProgressIndicator::find(root);
        selector.mark_active(&target);
        progress.start(&target);

        let units = self.collector.collect(root);
        let total = units.len();
        let mut report = TranslationReport::new(&source, &target);
        report.units = total;
        let mut processed = 0;

        let pending = self.serve_from_cache(units, &source, &target, &mut report);
        processed += report.from_cache;
        if processed > 0 {
            progress.update(processed, total);
        }

        report.distinct_texts = pending.len();
        let batches = self.batch_manager.create_batches(pending);
        report.batches = batches.len();

        for batch in batches {
            tracing::debug!(
                "Batch {}: {} texts for {} elements",
                batch.index,
                batch.len(),
                batch.unit_count()
            );

            let resolved = self.resolve_batch(&batch.texts(), &source, &target).await;

            let mut translations = self.translations.borrow_mut();
            for (item, resolved) in batch.items.iter().zip(resolved) {
                for unit in &item.units {
                    unit.apply(&resolved.text);
                    if resolved.origin.is_translated() {
                        unit.clear_failed();
                    } else {
                        unit.mark_failed();
                    }
                }
                processed += item.units.len();
                report.count(&resolved.origin, item.units.len());

                if resolved.origin.is_translated() {
                    translations.insert(&target, item.text.clone(), resolved.text);
                }
            }
            drop(translations);

            progress.update(processed, total);
        }

        *self.current_language.borrow_mut() = target.clone();
        if let Err(e) = self.preferences.save(&target) {
            tracing::warn!("Could not store preferred language {}: {}", target, e);
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        progress.finish();
        selector.close();

        report.elapsed = started.elapsed();
        tracing::info!(
            "Switched to {} in {:?}: {} elements, {} cached, {} dictionary, {} remote, {} fallback, {} unchanged",
            target,
            report.elapsed,
            report.units,
            report.from_cache,
            report.from_dictionary,
            report.from_remote,
            report.from_fallback,
            report.unchanged
        );

        LanguageChange::Completed(report)
    }

    /// Applies cached translations and returns the distinct texts still to
    /// resolve, each with the elements showing it
    fn serve_from_cache(
        &self,
        units: Vec<TextUnit>,
        source: &LanguageCode,
        target: &LanguageCode,
        report: &mut TranslationReport,
    ) -> Vec<PendingText> {
        let mut used_ids: HashSet<String> = units.iter().filter_map(TextUnit::id).collect();
        let mut pending: Vec<PendingText> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        let mut originals = self.originals.borrow_mut();
        let mut translations = self.translations.borrow_mut();

        for unit in units {
            let id = match unit.id() {
                Some(id) => id,
                None => {
                    let id = self.fresh_id(&used_ids);
                    unit.assign_id(&id);
                    used_ids.insert(id.clone());
                    id
                }
            };

            let original = match originals.get(source, &id) {
                Some(text) => text.to_string(),
                None => {
                    let live = unit.text();
                    originals.record(source, &id, &live);
                    live
                }
            };

            if let Some(cached) = translations.get(target, &original) {
                unit.apply(&cached);
                unit.clear_failed();
                report.count(&TextOrigin::Cache, 1);
                continue;
            }

            unit.mark_translating();
            match positions.get(&original) {
                Some(&index) => pending[index].units.push(unit),
                None => {
                    positions.insert(original.clone(), pending.len());
                    pending.push(PendingText::new(original, unit));
                }
            }
        }

        pending
    }

    /// Local dictionary per string, one remote call for the misses
    async fn resolve_batch(
        &self,
        texts: &[String],
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Vec<ResolvedText> {
        let mut resolved: Vec<Option<ResolvedText>> = texts
            .iter()
            .map(|text| {
                self.dictionary
                    .lookup(text, source, target)
                    .map(|phrase| ResolvedText::new(phrase, TextOrigin::Dictionary))
            })
            .collect();

        let (indexes, misses): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(index, _)| resolved[*index].is_none())
            .map(|(index, text)| (index, text.clone()))
            .unzip();

        if !misses.is_empty() {
            let remote = self.client.translate(&misses, source, target).await;
            for (index, text) in indexes.into_iter().zip(remote) {
                resolved[index] = Some(text);
            }
        }

        resolved
            .into_iter()
            .zip(texts)
            .map(|(text, original)| text.unwrap_or_else(|| ResolvedText::unchanged(original.as_str())))
            .collect()
    }

    fn fresh_id(&self, used: &HashSet<String>) -> String {
        loop {
            let n = self.next_id.get();
            self.next_id.set(n + 1);
            let id = format!("text-{}", n);
            if !used.contains(&id) {
                return id;
            }
        }
    }

    /// A language button was clicked
    pub async fn handle_selector_click(&self, root: &Handle, control: &Handle) -> LanguageChange {
        match LanguageSelector::language_of(control) {
            Some(language) => self.change_language(root, &language).await,
            None => LanguageChange::Ignored(IgnoreReason::NoLanguage),
        }
    }

    /// The language dialog became visible
    pub fn on_selector_shown(&self, root: &Handle) {
        LanguageSelector::find(root).mark_active(&self.current_language());
    }

    /// Re-applies the language stored by an earlier session
    pub async fn restore_preferred_language(&self, root: &Handle) -> LanguageChange {
        let Some(stored) = self.stored_language() else {
            self.on_selector_shown(root);
            return LanguageChange::Ignored(IgnoreReason::NoStoredPreference);
        };

        tracing::info!("Restoring preferred language {}", stored);
        let change = self.change_language(root, stored.as_str()).await;
        if !change.is_completed() {
            self.on_selector_shown(root);
        }
        change
    }

    /// Language remembered by the preference store
    ///
    /// An unreadable store counts as no preference.
    pub fn stored_language(&self) -> Option<LanguageCode> {
        self.preferences.load().unwrap_or_else(|e| {
            e.log();
            None
        })
    }

    /// Translation cached for `text` in `target`, without touching statistics
    pub fn cached_translation(&self, target: &str, text: &str) -> Option<String> {
        self.translations
            .borrow()
            .peek(&LanguageCode::new(target), text)
            .map(str::to_string)
    }

    /// Text an element showed in `language` before it was first translated
    pub fn original_text(&self, language: &str, unit_id: &str) -> Option<String> {
        self.originals
            .borrow()
            .get(&LanguageCode::new(language), unit_id)
            .map(str::to_string)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.translations.borrow().get_stats()
    }

    pub fn cached_translation_count(&self, target: &str) -> usize {
        self.translations.borrow().len_for(&LanguageCode::new(target))
    }

    /// Drops both session caches
    pub fn clear_caches(&self) {
        self.originals.borrow_mut().clear();
        self.translations.borrow_mut().clear();
    }
}
