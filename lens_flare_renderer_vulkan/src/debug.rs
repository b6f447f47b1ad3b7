/// Validation layer messages -> engine logger
///
/// With the `vulkan-validation` feature, `VulkanRenderer::new` installs a
/// debug-utils messenger whose callback forwards every message that passes
/// the configured `DebugSeverity` to `Engine::log` under the source
/// `"lensflare::validation"`, and counts it.

use ash::vk;
use colored::*;
use lens_flare_engine::lensflare::config::DebugSeverity;
use lens_flare_engine::lensflare::log::LogSeverity;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Filter applied by the callback; `None` drops everything
static SEVERITY_FILTER: Mutex<Option<DebugSeverity>> = Mutex::new(None);

static VALIDATION_STATS: StatsTracker = StatsTracker::new();

/// Validation messages counted since the renderer was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }

    /// Print a colored summary to stdout
    pub fn print_report(&self) {
        if self.total() == 0 {
            println!("{}", "No validation messages".green().bold());
            return;
        }

        println!("{}", "=== Validation messages ===".bright_blue().bold());
        if self.errors > 0 {
            println!("  {} {}", "Errors:".red().bold(), self.errors);
        }
        if self.warnings > 0 {
            println!("  {} {}", "Warnings:".yellow().bold(), self.warnings);
        }
        if self.info > 0 {
            println!("  {} {}", "Info:".cyan(), self.info);
        }
        if self.verbose > 0 {
            println!("  {} {}", "Verbose:".bright_black(), self.verbose);
        }
        println!("  {} {}", "Total:".white().bold(), self.total());
    }
}

struct StatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    verbose: AtomicU32,
}

impl StatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            verbose: AtomicU32::new(0),
        }
    }

    fn record(&self, severity: LogSeverity) {
        let counter = match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            LogSeverity::Debug | LogSeverity::Trace => &self.verbose,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            verbose: self.verbose.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.verbose.store(0, Ordering::Relaxed);
    }
}

/// Current validation message counts
pub fn validation_stats() -> ValidationStats {
    VALIDATION_STATS.snapshot()
}

/// Arm the callback with `severity` and reset the counters
pub(crate) fn install_filter(severity: DebugSeverity) {
    VALIDATION_STATS.reset();
    if let Ok(mut filter) = SEVERITY_FILTER.lock() {
        *filter = Some(severity);
    }
}

/// Disarm the callback before the messenger is destroyed
pub(crate) fn clear_filter() {
    if let Ok(mut filter) = SEVERITY_FILTER.lock() {
        *filter = None;
    }
}

/// Messenger severity mask for a filter level
pub(crate) fn severity_flags(severity: DebugSeverity) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    use vk::DebugUtilsMessageSeverityFlagsEXT as Flags;
    match severity {
        DebugSeverity::ErrorsOnly => Flags::ERROR,
        DebugSeverity::ErrorsAndWarnings => Flags::ERROR | Flags::WARNING,
        DebugSeverity::All => Flags::ERROR | Flags::WARNING | Flags::INFO | Flags::VERBOSE,
    }
}

/// Engine log level of a validation message
pub(crate) fn log_severity(flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> LogSeverity {
    use vk::DebugUtilsMessageSeverityFlagsEXT as Flags;
    if flags.contains(Flags::ERROR) {
        LogSeverity::Error
    } else if flags.contains(Flags::WARNING) {
        LogSeverity::Warn
    } else if flags.contains(Flags::INFO) {
        LogSeverity::Info
    } else {
        LogSeverity::Debug
    }
}

pub(crate) fn passes_filter(severity: DebugSeverity, flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> bool {
    severity_flags(severity).intersects(flags)
}

fn message_type_label(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        "validation"
    } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        "performance"
    } else {
        "general"
    }
}

/// Debug-utils messenger callback
#[cfg(feature = "vulkan-validation")]
pub(crate) unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    use lens_flare_engine::lensflare::Engine;
    use std::ffi::CStr;

    let filter = match SEVERITY_FILTER.lock() {
        Ok(guard) => *guard,
        Err(_) => None,
    };
    let Some(filter) = filter else {
        return vk::FALSE;
    };
    if !passes_filter(filter, message_severity) || p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = *p_callback_data;
    let message_id = if callback_data.p_message_id_name.is_null() {
        "unknown".into()
    } else {
        CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy()
    };
    let message = if callback_data.p_message.is_null() {
        "no message".into()
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy()
    };

    let severity = log_severity(message_severity);
    VALIDATION_STATS.record(severity);
    Engine::log(
        severity,
        "lensflare::validation",
        format!("[{}] {}: {}", message_type_label(message_type), message_id, message),
    );

    vk::FALSE
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
