//! The Netscape PAC helper surface, installed into a Boa context as native
//! functions.
//!
//! Boa renders an absent argument as the string `"undefined"`; every helper
//! treats that literal as an invalid call and answers `false`/`0`, matching
//! how PAC hosts have historically behaved.

use super::temporal;
use boa_engine::{
    Context, JsArgs, JsData, JsNativeError, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{Finalize, Trace};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::trace;
use wpadproxy_application::ports::HostResolver;
use wpadproxy_domain::ip;

const UNDEFINED: &str = "undefined";

/// Host state shared by the helpers of one evaluation.
pub(super) struct EvalEnv {
    pub local_ip: String,
    pub resolver: Arc<dyn HostResolver>,
    pub cacheable: Cell<bool>,
}

/// GC-opaque capture handle handed to Boa with each native function.
#[derive(Clone, Trace, Finalize, JsData)]
struct HostEnv {
    #[unsafe_ignore_trace]
    env: Rc<EvalEnv>,
}

fn register<F>(
    context: &mut Context,
    name: &str,
    length: usize,
    host: &HostEnv,
    body: F,
) -> JsResult<()>
where
    F: Fn(&Rc<EvalEnv>, &[JsValue], &mut Context) -> JsResult<JsValue> + Copy + 'static,
{
    context.register_global_callable(
        JsString::from(name),
        length,
        NativeFunction::from_copy_closure_with_captures(
            move |_this, args, host, ctx| body(&host.env, args, ctx),
            host.clone(),
        ),
    )
}

fn string_arg(args: &[JsValue], index: usize, ctx: &mut Context) -> JsResult<String> {
    Ok(args
        .get_or_undefined(index)
        .to_string(ctx)?
        .to_std_string_escaped())
}

fn string_args(args: &[JsValue], ctx: &mut Context) -> JsResult<Vec<String>> {
    args.iter()
        .map(|value| Ok(value.to_string(ctx)?.to_std_string_escaped()))
        .collect()
}

/// Translate a shell glob into an anchored regex: `.` is escaped, `*` becomes
/// `.*`, `?` becomes `.`. Unlike path matching, `*` crosses `/`.
fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    for c in pattern.chars() {
        match c {
            '.' => regex.push_str("\\."),
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push(other),
        }
    }
    regex.push('$');
    regex
}

pub(super) fn shexp_matches(value: &str, pattern: &str) -> bool {
    match fancy_regex::Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(value).unwrap_or(false),
        Err(_) => false,
    }
}

/// Install the full helper surface into `context`.
pub(super) fn install(context: &mut Context, env: Rc<EvalEnv>) -> JsResult<()> {
    let host = HostEnv { env };

    register(context, "myIpAddress", 0, &host, |env, _args, _ctx| {
        Ok(JsString::from(env.local_ip.as_str()).into())
    })?;

    register(context, "dnsDomainIs", 2, &host, |_env, args, ctx| {
        let host_arg = string_arg(args, 0, ctx)?;
        let domain = string_arg(args, 1, ctx)?;
        if host_arg == UNDEFINED || domain == UNDEFINED {
            return Ok(false.into());
        }
        Ok(host_arg.ends_with(&domain).into())
    })?;

    register(context, "localHostOrDomainIs", 2, &host, |_env, args, ctx| {
        let host_arg = string_arg(args, 0, ctx)?;
        let hostdom = string_arg(args, 1, ctx)?;
        if host_arg == UNDEFINED || hostdom == UNDEFINED {
            return Ok(false.into());
        }
        let domain_match = host_arg.ends_with(&hostdom);
        let host_match = hostdom
            .split('.')
            .next()
            .is_some_and(|first| first == host_arg);
        Ok((domain_match || host_match).into())
    })?;

    register(context, "isPlainHostName", 1, &host, |_env, args, ctx| {
        let host_arg = string_arg(args, 0, ctx)?;
        if host_arg == UNDEFINED {
            return Ok(false.into());
        }
        Ok((!host_arg.contains('.')).into())
    })?;

    register(context, "shExpMatch", 2, &host, |_env, args, ctx| {
        let value = string_arg(args, 0, ctx)?;
        let pattern = string_arg(args, 1, ctx)?;
        if value == UNDEFINED || pattern == UNDEFINED {
            return Ok(false.into());
        }
        Ok(shexp_matches(&value, &pattern).into())
    })?;

    register(context, "dnsResolve", 1, &host, |env, args, ctx| {
        let name = string_arg(args, 0, ctx)?;
        if name == UNDEFINED {
            return Ok(false.into());
        }
        match env.resolver.first_ipv4(&name) {
            Some(addr) => {
                trace!(host = %name, addr = %addr, "dnsResolve");
                Ok(JsString::from(addr.as_str()).into())
            }
            None => Ok(false.into()),
        }
    })?;

    register(context, "isResolvable", 1, &host, |env, args, ctx| {
        let name = string_arg(args, 0, ctx)?;
        if name == UNDEFINED {
            return Ok(false.into());
        }
        Ok(env.resolver.first_ipv4(&name).is_some().into())
    })?;

    register(context, "isInNet", 3, &host, |_env, args, ctx| {
        let host_arg = string_arg(args, 0, ctx)?;
        let pattern = string_arg(args, 1, ctx)?;
        let mask = string_arg(args, 2, ctx)?;
        if host_arg == UNDEFINED || pattern == UNDEFINED || mask == UNDEFINED {
            return Ok(false.into());
        }
        Ok(ip::is_ip_in_range(&host_arg, &pattern, &mask)
            .unwrap_or(false)
            .into())
    })?;

    register(context, "convert_addr", 1, &host, |_env, args, ctx| {
        let addr = string_arg(args, 0, ctx)?;
        Ok(JsValue::from(ip::ip_to_decimal(&addr) as f64))
    })?;

    register(context, "dnsDomainLevels", 1, &host, |_env, args, ctx| {
        let name = string_arg(args, 0, ctx)?;
        if name == UNDEFINED {
            return Ok(JsValue::from(0));
        }
        Ok(JsValue::from(name.matches('.').count() as i32))
    })?;

    register(context, "weekdayRange", 1, &host, |env, args, ctx| {
        env.cacheable.set(false);
        let tokens = string_args(args, ctx)?;
        Ok(temporal::weekday_range(&tokens).into())
    })?;

    register(context, "dateRange", 1, &host, |env, args, ctx| {
        env.cacheable.set(false);
        let tokens = string_args(args, ctx)?;
        Ok(temporal::date_range(&tokens).into())
    })?;

    register(context, "timeRange", 1, &host, |env, args, ctx| {
        env.cacheable.set(false);
        let tokens = string_args(args, ctx)?;
        match temporal::time_range(&tokens) {
            Ok(matched) => Ok(matched.into()),
            Err(message) => Err(JsNativeError::typ().with_message(message).into()),
        }
    })?;

    Ok(())
}
