use std::path::PathBuf;

pub const MAX_SEQ_LEN: usize = 512;

/// Cross-encoder size variant, trading accuracy for resource use on
/// constrained hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// `bge-reranker-base`: fits small boards, the default.
    #[default]
    Lightweight,
    /// `bge-reranker-v2-m3`: more accurate, heavier.
    Full,
}

impl ModelVariant {
    /// Directory name of this variant under a models root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModelVariant::Lightweight => "bge-reranker-base",
            ModelVariant::Full => "bge-reranker-v2-m3",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RerankerConfig {
    /// Explicit model directory (config.json + model.safetensors +
    /// tokenizer.json). Takes precedence over `models_root`.
    pub model_path: Option<PathBuf>,

    /// Root directory holding one subdirectory per [`ModelVariant`].
    pub models_root: Option<PathBuf>,

    /// Which variant to resolve under `models_root`.
    pub variant: ModelVariant,

    /// Attempt a half-precision weight load first. Unsupported setups fall
    /// back to full precision; the event is logged, never fatal.
    pub quantize: bool,
}

impl RerankerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Self::default()
        }
    }

    /// No model configured: the reranker runs its lexical placeholder scorer.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_variant(mut self, variant: ModelVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    /// Resolves the model directory from the explicit path or the variant
    /// subdirectory; `None` means stub mode.
    pub fn resolved_model_dir(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.model_path {
            return Some(path.clone());
        }
        self.models_root
            .as_ref()
            .map(|root| root.join(self.variant.dir_name()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        if let Some(ref root) = self.models_root
            && root.as_os_str().is_empty()
        {
            return Err("models_root cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let parse_path = |var: &str| {
            std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        let variant = match std::env::var("DOCQA_RERANKER_FULL_MODEL").ok().as_deref() {
            Some("1") | Some("true") => ModelVariant::Full,
            _ => ModelVariant::Lightweight,
        };

        let quantize = !matches!(
            std::env::var("DOCQA_RERANKER_QUANTIZE").ok().as_deref(),
            Some("0") | Some("false")
        );

        Self {
            model_path: parse_path("DOCQA_RERANKER_PATH"),
            models_root: parse_path("DOCQA_RERANKER_MODELS_ROOT"),
            variant,
            quantize,
        }
    }
}
