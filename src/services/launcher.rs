use crate::services::diagnostics::DiagnosticSink;
use nix::sys::wait::waitpid;
use nix::unistd::{fork, ForkResult, Pid};
use std::ffi::CString;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Код выхода дочернего процесса, если exec не удался
pub const EXEC_FAILED_STATUS: i32 = 2;

/// Запуск внешних программ из скриптов по принципу "запустил и забыл"
pub struct ProcessLauncher {
    sink: Arc<DiagnosticSink>,
    reap_children: bool,
}

impl ProcessLauncher {
    pub fn new(sink: Arc<DiagnosticSink>, reap_children: bool) -> Self {
        info!("Инициализация ProcessLauncher (reap_children: {})", reap_children);
        Self {
            sink,
            reap_children,
        }
    }

    /// fork + exec `path` без аргументов, возвращает pid сразу.
    ///
    /// Путь берётся буквально, PATH не просматривается. Если exec не удался,
    /// дочерний процесс пишет об этом в stderr и выходит с кодом
    /// [`EXEC_FAILED_STATUS`]; родитель этого не видит. None только если
    /// процесс вообще не удалось создать.
    pub fn launch(&self, path: &str) -> Option<u32> {
        self.sink.log(&format!("launching program {}", path));

        let program = match CString::new(path) {
            Ok(program) => program,
            Err(e) => {
                self.sink.log(&format!("exec failed: {}: {}", path, e));
                warn!("Неверный путь программы {:?}: {}", path, e);
                return None;
            }
        };
        // Всё, что нужно потомку, готовится до fork: после него только exec, write и _exit
        let argv = [program.as_ptr(), std::ptr::null()];
        let notice = format!("exec failed: {}\n", path);

        // SAFETY: в дочерней ветке вызываются только async-signal-safe функции
        match unsafe { fork() } {
            Ok(ForkResult::Child) => unsafe {
                libc::execv(program.as_ptr(), argv.as_ptr());
                libc::write(libc::STDERR_FILENO, notice.as_ptr().cast(), notice.len());
                libc::_exit(EXEC_FAILED_STATUS)
            },
            Ok(ForkResult::Parent { child }) => {
                self.sink.log(&format!("launched {} as pid {}", path, child));
                if self.reap_children {
                    Self::spawn_reaper(path, child);
                }
                // Без reaper дочерний процесс остаётся зомби до выхода менеджера
                u32::try_from(child.as_raw()).ok()
            }
            Err(e) => {
                self.sink.log(&format!("fork failed: {}: {}", path, e));
                error!("Не удалось создать процесс для {}: {}", path, e);
                None
            }
        }
    }

    fn spawn_reaper(path: &str, child: Pid) {
        let path = path.to_string();
        let spawned = std::thread::Builder::new()
            .name(format!("reap-{}", child))
            .spawn(move || match waitpid(child, None) {
                Ok(status) => debug!("Процесс {} (pid {}) завершился: {:?}", path, child, status),
                Err(e) => warn!("Не удалось дождаться процесса {} (pid {}): {}", path, child, e),
            });

        if let Err(e) = spawned {
            warn!("Не удалось запустить reaper для pid {}: {}", child, e);
        }
    }
}
