//! Android-specific platform functionality
//!
//! Checks and requests runtime permissions using JNI to call Android APIs.

use super::attachment::Attachment;
use jni::objects::{GlobalRef, JClass, JObject, JValue};
use jni::{JNIEnv, JavaVM};
use samplepicker_engine::{Permission, PermissionSubsystem};

const PERMISSION_GRANTED: i32 = 0; // PackageManager.PERMISSION_GRANTED

/// Get the Android SDK version (Build.VERSION.SDK_INT)
fn get_sdk_version(env: &mut JNIEnv) -> Result<i32, jni::errors::Error> {
    let build_version = env.find_class("android/os/Build$VERSION")?;
    let sdk_int = env.get_static_field(build_version, "SDK_INT", "I")?;
    sdk_int.i()
}

/// ContextCompat.checkSelfPermission(context, permission) == PERMISSION_GRANTED
fn check_self_permission(
    env: &mut JNIEnv,
    context: &JObject,
    permission: &str,
) -> Result<bool, jni::errors::Error> {
    let context_compat = env.find_class("androidx/core/content/ContextCompat")?;
    let permission = env.new_string(permission)?;

    let result = env.call_static_method(
        context_compat,
        "checkSelfPermission",
        "(Landroid/content/Context;Ljava/lang/String;)I",
        &[JValue::Object(context), JValue::Object(&permission.into())],
    )?;

    Ok(result.i()? == PERMISSION_GRANTED)
}

/// ActivityCompat.requestPermissions(activity, permissions, requestCode)
fn request_permissions(
    env: &mut JNIEnv,
    activity: &JObject,
    permissions: &[Permission],
    request_code: i32,
) -> Result<(), jni::errors::Error> {
    let string_class = env.find_class("java/lang/String")?;
    let array = env.new_object_array(permissions.len() as i32, string_class, JObject::null())?;
    for (index, permission) in permissions.iter().enumerate() {
        let name = env.new_string(permission.as_str())?;
        env.set_object_array_element(&array, index as i32, name)?;
    }

    let activity_compat = env.find_class("androidx/core/app/ActivityCompat")?;
    env.call_static_method(
        activity_compat,
        "requestPermissions",
        "(Landroid/app/Activity;[Ljava/lang/String;I)V",
        &[
            JValue::Object(activity),
            JValue::Object(&array),
            JValue::Int(request_code),
        ],
    )?;

    Ok(())
}

struct AttachedActivity {
    vm: JavaVM,
    activity: GlobalRef,
}

static ACTIVITY: Attachment<AttachedActivity> = Attachment::new();

fn attach(env: &JNIEnv, activity: &JObject) -> Result<AttachedActivity, jni::errors::Error> {
    Ok(AttachedActivity {
        vm: env.get_java_vm()?,
        activity: env.new_global_ref(activity)?,
    })
}

/// `NativeBridge.attachActivity(activity)`, called from the activity's onCreate.
#[unsafe(no_mangle)]
pub extern "system" fn Java_tech_nekonyan_samplepicker_NativeBridge_attachActivity(
    env: JNIEnv,
    _class: JClass,
    activity: JObject,
) {
    match attach(&env, &activity) {
        Ok(attached) => {
            ACTIVITY.attach(attached);
            log::info!("Activity attached");
        }
        Err(e) => log::error!("Failed to attach activity: {e}"),
    }
}

/// `NativeBridge.detachActivity()`, called from the activity's onDestroy.
#[unsafe(no_mangle)]
pub extern "system" fn Java_tech_nekonyan_samplepicker_NativeBridge_detachActivity(
    _env: JNIEnv,
    _class: JClass,
) {
    ACTIVITY.detach();
}

/// Helper to run JNI operations against the attached activity.
///
/// Returns None when no activity is attached or the call fails.
fn with_jni<F, T>(f: F) -> Option<T>
where
    F: FnOnce(&mut JNIEnv, &JObject) -> Result<T, jni::errors::Error>,
{
    let result = ACTIVITY.with(|attached| {
        let mut env = match attached.vm.attach_current_thread() {
            Ok(env) => env,
            Err(e) => {
                log::error!("JNI attach failed: {e}");
                return None;
            }
        };

        match f(&mut env, attached.activity.as_obj()) {
            Ok(result) => Some(result),
            Err(e) => {
                log::error!("JNI error: {e}");
                None
            }
        }
    });

    if result.is_none() {
        log::warn!("No activity attached; call NativeBridge.attachActivity first");
    }
    result.flatten()
}

/// The platform SDK level.
pub fn sdk_version() -> Option<u32> {
    let version = with_jni(|env, _context| get_sdk_version(env))?;
    log::info!("Android SDK version: {version}");
    u32::try_from(version).ok()
}

/// Permission subsystem backed by the attached activity.
pub struct AndroidPermissions;

impl PermissionSubsystem for AndroidPermissions {
    fn check_granted(&self, permission: Permission) -> bool {
        with_jni(|env, context| check_self_permission(env, context, permission.as_str()))
            .unwrap_or(false)
    }

    fn request(&self, permissions: &[Permission], request_code: i32) {
        if with_jni(|env, activity| request_permissions(env, activity, permissions, request_code))
            .is_none()
        {
            log::warn!("Permission request could not be shown");
        }
    }
}
