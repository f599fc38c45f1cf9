use crate::error::GCError;
use crate::object::ObjectId;
use crate::{GCResult, GarbageCollector};
use parking_lot::Mutex;
use std::ffi::{c_int, c_void};

static GC: Mutex<Option<GarbageCollector<ObjectId>>> = Mutex::new(None);

#[inline(always)]
fn with_gc<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut GarbageCollector<ObjectId>) -> R,
{
    GC.lock().as_mut().map(f)
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GCReturnCode {
    Success = 0,
    ErrorDuplicateObject = -1,
    ErrorUnknownObject = -2,
    ErrorNotInitialized = -3,
    ErrorInvalidArgument = -4,
}

impl From<GCResult<()>> for GCReturnCode {
    fn from(result: GCResult<()>) -> Self {
        match result {
            Ok(()) => GCReturnCode::Success,
            Err(GCError::DuplicateObject(_)) => GCReturnCode::ErrorDuplicateObject,
            Err(GCError::UnknownObject(_)) => GCReturnCode::ErrorUnknownObject,
        }
    }
}

impl From<Option<GCResult<()>>> for GCReturnCode {
    fn from(result: Option<GCResult<()>>) -> Self {
        result.map_or(GCReturnCode::ErrorNotInitialized, GCReturnCode::from)
    }
}

/// Creates the process-wide collector, replacing any previous one, and
/// installs a `RUST_LOG`-driven logger if none is set yet.
#[unsafe(no_mangle)]
pub extern "C" fn gc_init() -> GCReturnCode {
    let _ = env_logger::try_init();
    *GC.lock() = Some(GarbageCollector::new());
    GCReturnCode::Success
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_cleanup() -> GCReturnCode {
    *GC.lock() = None;
    GCReturnCode::Success
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_is_initialized() -> c_int {
    GC.lock().is_some() as c_int
}

/// Registers `obj` with the given external reference count. The pointer is
/// only used as an identity.
#[unsafe(no_mangle)]
pub extern "C" fn gc_add_object(obj: *mut c_void, ref_count: c_int) -> GCReturnCode {
    if obj.is_null() || ref_count < 0 {
        return GCReturnCode::ErrorInvalidArgument;
    }

    with_gc(|gc| gc.add_object_with_ref_count(ObjectId::from_ptr(obj), ref_count as usize))
        .into()
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_add_dependency(from: *mut c_void, to: *mut c_void) -> GCReturnCode {
    if from.is_null() || to.is_null() {
        return GCReturnCode::ErrorInvalidArgument;
    }

    with_gc(|gc| gc.add_dependency(&ObjectId::from_ptr(from), &ObjectId::from_ptr(to))).into()
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_arrange_collection() -> GCReturnCode {
    with_gc(|gc| {
        gc.arrange_collection();
        Ok(())
    })
    .into()
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_reset() -> GCReturnCode {
    with_gc(|gc| {
        gc.reset();
        Ok(())
    })
    .into()
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_set_debug(flags: c_int) -> GCReturnCode {
    if flags < 0 {
        return GCReturnCode::ErrorInvalidArgument;
    }

    with_gc(|gc| {
        gc.set_debug(flags as u32);
        Ok(())
    })
    .into()
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_get_regular_count() -> c_int {
    with_gc(|gc| gc.regular_objects().len() as c_int).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_get_cycled_count() -> c_int {
    with_gc(|gc| gc.cycled_objects().len() as c_int).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn gc_is_cycled(obj: *mut c_void) -> c_int {
    if obj.is_null() {
        return 0;
    }

    with_gc(|gc| gc.is_cycled(&ObjectId::from_ptr(obj)) as c_int).unwrap_or(0)
}

unsafe fn copy_objects(objects: &[ObjectId], out: *mut *mut c_void, len: usize) -> c_int {
    let count = objects.len().min(len);
    for (i, id) in objects.iter().take(count).enumerate() {
        unsafe {
            *out.add(i) = id.as_ptr();
        }
    }
    count as c_int
}

/// Copies up to `len` regular object pointers, in free order, into `out`.
/// Returns how many were written, or -1 on a null buffer or missing collector.
///
/// # Safety
///
/// `out` must be valid for writes of `len` pointers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gc_copy_regular(out: *mut *mut c_void, len: usize) -> c_int {
    if out.is_null() {
        return -1;
    }

    with_gc(|gc| unsafe { copy_objects(gc.regular_objects(), out, len) }).unwrap_or(-1)
}

/// Copies up to `len` cycled object pointers into `out`.
/// Returns how many were written, or -1 on a null buffer or missing collector.
///
/// # Safety
///
/// `out` must be valid for writes of `len` pointers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gc_copy_cycled(out: *mut *mut c_void, len: usize) -> c_int {
    if out.is_null() {
        return -1;
    }

    with_gc(|gc| unsafe { copy_objects(gc.cycled_objects(), out, len) }).unwrap_or(-1)
}

#[repr(C)]
pub struct GCStats {
    pub total_tracked: c_int,
    pub dependencies: c_int,
    pub external_refs: c_int,
    pub regular: c_int,
    pub cycled: c_int,
    pub passes: c_int,
    pub collections: c_int,
}

/// Retrieves statistics for the process-wide collector.
///
/// # Safety
///
/// The caller must ensure that `stats` is a valid pointer to a `GCStats` struct.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gc_get_stats(stats: *mut GCStats) -> GCReturnCode {
    if stats.is_null() {
        return GCReturnCode::ErrorInvalidArgument;
    }

    let Some(rust_stats) = with_gc(|gc| gc.get_stats()) else {
        return GCReturnCode::ErrorNotInitialized;
    };

    unsafe {
        *stats = GCStats {
            total_tracked: rust_stats.total_tracked as c_int,
            dependencies: rust_stats.dependencies as c_int,
            external_refs: rust_stats.external_refs as c_int,
            regular: rust_stats.regular as c_int,
            cycled: rust_stats.cycled as c_int,
            passes: rust_stats.passes as c_int,
            collections: rust_stats.collections as c_int,
        };
    }

    GCReturnCode::Success
}
